//! Synthetic candles for development and offline demos.
//!
//! Produces a deterministic random walk per ticker, seeded from the ticker
//! name. The walk always starts at a fixed epoch, so two requests with
//! overlapping ranges agree on every shared day. Weekends are skipped.

use super::provider::{require_data, CandleProvider, DataError, DataSource};
use crate::domain::{Candle, CandleSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    epoch: NaiveDate,
    start_price: f64,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self {
            epoch: NaiveDate::from_ymd_opt(2000, 1, 3).unwrap_or_default(),
            start_price: 100.0,
        }
    }

    fn walk(&self, ticker: &str, end: NaiveDate) -> Vec<Candle> {
        let seed: [u8; 32] = *blake3::hash(ticker.to_ascii_uppercase().as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut candles = Vec::new();
        let mut price = self.start_price;
        let mut current = self.epoch;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));

            candles.push(Candle::new(current, open, high, low, close));

            price = close;
            current += chrono::Duration::days(1);
        }

        candles
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CandleProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch_daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CandleSeries, DataError> {
        let series = CandleSeries::new(self.walk(ticker, end))?;
        require_data(ticker, series.between(start, end))
    }
}
