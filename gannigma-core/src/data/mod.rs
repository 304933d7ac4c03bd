//! Market data providers

pub mod csv_file;
pub mod memory;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_file::CsvProvider;
pub use memory::InMemoryProvider;
pub use provider::{require_data, CandleProvider, DataError, DataSource};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
