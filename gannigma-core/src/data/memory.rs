//! In-memory provider backed by fixed candle series per ticker.

use super::provider::{require_data, CandleProvider, DataError, DataSource};
use crate::domain::CandleSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Serves pre-loaded series, filtered to the requested range.
///
/// Tickers are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, CandleSeries>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: &str, series: CandleSeries) -> Self {
        self.insert(ticker, series);
        self
    }

    pub fn insert(&mut self, ticker: &str, series: CandleSeries) {
        self.series.insert(ticker.to_ascii_uppercase(), series);
    }
}

impl CandleProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn source(&self) -> DataSource {
        DataSource::InMemory
    }

    fn fetch_daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CandleSeries, DataError> {
        let window = self
            .series
            .get(&ticker.to_ascii_uppercase())
            .map(|s| s.between(start, end))
            .unwrap_or_default();
        require_data(ticker, window)
    }
}
