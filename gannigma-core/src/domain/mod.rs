//! Domain types for Gannigma

pub mod candle;
pub mod mode;

pub use candle::{Candle, CandleSeries, SeriesError};
pub use mode::{SearchMode, VolatilityTier};
