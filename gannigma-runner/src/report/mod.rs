//! Reporting: price formatting, Markdown reports and artifact export.

pub mod export;
pub mod format;
pub mod markdown;

pub use export::{
    artifact_dir_name, export_json, export_levels_csv, import_json, load_artifacts,
    save_artifacts,
};
pub use format::format_price;
pub use markdown::generate_report;
