//! Model failures.
//!
//! Every variant aborts only the model invocation that raised it; callers
//! running several models keep going with the others.

use crate::data::DataError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("wrong ticker symbol or no data for '{ticker}'")]
    NoData { ticker: String },

    #[error("no data for '{ticker}' before {analysis_date}")]
    NoDataBeforeCutoff {
        ticker: String,
        analysis_date: NaiveDate,
    },

    #[error(
        "no extreme candle for '{ticker}': need the last 3 trading days, found {available} candle(s)"
    )]
    InsufficientHistory { ticker: String, available: usize },

    #[error(
        "not enough data for ATR({period}) on '{ticker}': {available} candle(s) before {analysis_date}"
    )]
    InsufficientAtrData {
        ticker: String,
        period: usize,
        available: usize,
        analysis_date: NaiveDate,
    },

    #[error("invalid span for '{ticker}' in {period}: high {high} is not above low {low}")]
    InvalidPeriodSpan {
        ticker: String,
        period: String,
        low: f64,
        high: f64,
    },

    #[error("no data for '{ticker}' in {period}")]
    MissingPeriodData { ticker: String, period: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("data provider failed for '{ticker}': {source}")]
    Provider {
        ticker: String,
        #[source]
        source: DataError,
    },
}

impl ModelError {
    /// Wrap a provider failure, keeping `NoData` as its own kind.
    pub fn from_data(ticker: &str, err: DataError) -> Self {
        match err {
            DataError::NoData { .. } => ModelError::NoData {
                ticker: ticker.to_string(),
            },
            source => ModelError::Provider {
                ticker: ticker.to_string(),
                source,
            },
        }
    }
}
