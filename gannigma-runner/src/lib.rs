//! Gannigma Runner: analysis config, main rhythm, three-model runs, reports.
//!
//! This crate builds on `gannigma-core` to provide:
//! - TOML analysis configuration with validation and fingerprinting
//! - Main-rhythm small-divisor table for the 360° grid
//! - Single and batch analysis runs (each model isolated from the others)
//! - Markdown reports and JSON/CSV artifact export

pub mod config;
pub mod report;
pub mod rhythm;
pub mod runner;

pub use config::{AnalysisConfig, ConfigError, DEFAULT_TICKER};
pub use report::{format_price, generate_report, save_artifacts};
pub use rhythm::{MainRhythm, BASE_SMALL_DIVISORS, DEFAULT_SMALL_DIVISOR_INDEX};
pub use runner::{
    run_analysis, run_batch, AnalysisReport, ModelOutcome, ModelRun, SCHEMA_VERSION,
};
