//! Candle provider trait and structured error types.
//!
//! The `CandleProvider` trait abstracts over data sources (Yahoo Finance, CSV
//! files, synthetic data, in-memory fixtures) so the model pipeline can run
//! against any of them and tests never touch the network.

use crate::domain::{CandleSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output and reports.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// Provider returned nothing: unknown ticker or no data in range.
    #[error("wrong ticker symbol or no data for '{ticker}'")]
    NoData { ticker: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid candle series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Where candles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvFile,
    Synthetic,
    InMemory,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::CsvFile => "CSV file",
            DataSource::Synthetic => "synthetic",
            DataSource::InMemory => "in-memory",
        }
    }
}

/// Trait for daily candle providers.
///
/// Contract: candles are daily, ascending by date, within `[start, end]`
/// inclusive. An empty result is reported as [`DataError::NoData`], never as
/// an empty series.
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Which kind of source backs this provider.
    fn source(&self) -> DataSource;

    /// Fetch daily candles for a ticker over an inclusive date range.
    fn fetch_daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CandleSeries, DataError>;
}

/// Map an empty series to [`DataError::NoData`].
pub fn require_data(ticker: &str, series: CandleSeries) -> Result<CandleSeries, DataError> {
    if series.is_empty() {
        return Err(DataError::NoData {
            ticker: ticker.to_string(),
        });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_message_names_ticker() {
        let err = DataError::NoData {
            ticker: "XYZ".into(),
        };
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn require_data_rejects_empty() {
        let err = require_data("ABC", CandleSeries::empty()).unwrap_err();
        assert_eq!(
            err,
            DataError::NoData {
                ticker: "ABC".into()
            }
        );
    }
}
