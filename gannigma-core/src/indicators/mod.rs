//! Indicators computed over daily candles.
//!
//! Each indicator returns one value per input candle; positions without
//! enough history are NaN. Only the most recent value feeds the models.

pub mod atr;

pub use atr::{true_range, Atr};

use crate::domain::Candle;

/// A per-candle indicator series.
pub trait Indicator {
    /// Stable identifier, e.g. `atr_14`.
    fn name(&self) -> &str;

    /// Number of leading candles before the first defined value.
    fn lookback(&self) -> usize;

    /// Compute the series, aligned index-for-index with `candles`.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;

    /// Value aligned to the most recent candle, if defined.
    fn current(&self, candles: &[Candle]) -> Option<f64> {
        self.compute(candles)
            .last()
            .copied()
            .filter(|v| v.is_finite())
    }
}

/// Create synthetic candles from OHLC tuples for testing.
#[cfg(test)]
pub fn make_candles(data: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            Candle::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
