//! Candles and the date-ordered series built from them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily OHLC candle for a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Returns true if any OHLC field is NaN (void candle).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    /// Midpoint of the candle's high/low range.
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("candles out of order: {next} does not follow {previous}")]
    OutOfOrder { previous: NaiveDate, next: NaiveDate },
}

/// Candles in strictly increasing date order, at most one per day.
///
/// Every slicing operation returns a new series; the source is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Candle>", into = "Vec<Candle>")]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series from candles that must already be strictly ascending by date.
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        for pair in candles.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { candles })
    }

    /// Build a series from provider output: sorts by date and keeps the last
    /// candle seen for any duplicated date.
    pub fn from_unsorted(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.date);
        let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match deduped.last_mut() {
                Some(last) if last.date == candle.date => *last = candle,
                _ => deduped.push(candle),
            }
        }
        Self { candles: deduped }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Look up the candle for an exact date.
    pub fn get(&self, date: NaiveDate) -> Option<&Candle> {
        self.candles
            .binary_search_by_key(&date, |c| c.date)
            .ok()
            .map(|i| &self.candles[i])
    }

    /// The last `n` candles (all of them when fewer exist).
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    /// Candles dated strictly before `cutoff`.
    pub fn before(&self, cutoff: NaiveDate) -> CandleSeries {
        let end = self.candles.partition_point(|c| c.date < cutoff);
        Self {
            candles: self.candles[..end].to_vec(),
        }
    }

    /// Candles dated within `[start, end]`, inclusive.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> CandleSeries {
        let lo = self.candles.partition_point(|c| c.date < start);
        let hi = self.candles.partition_point(|c| c.date <= end);
        if lo >= hi {
            return Self::empty();
        }
        Self {
            candles: self.candles[lo..hi].to_vec(),
        }
    }

    /// Candles of one calendar month.
    pub fn in_month(&self, year: i32, month: u32) -> CandleSeries {
        Self {
            candles: self
                .candles
                .iter()
                .filter(|c| c.date.year() == year && c.date.month() == month)
                .copied()
                .collect(),
        }
    }

    /// Candles of one calendar year.
    pub fn in_year(&self, year: i32) -> CandleSeries {
        Self {
            candles: self
                .candles
                .iter()
                .filter(|c| c.date.year() == year)
                .copied()
                .collect(),
        }
    }

    /// Lowest low and highest high, ignoring NaN values.
    pub fn low_high(&self) -> Option<(f64, f64)> {
        let low = self
            .candles
            .iter()
            .map(|c| c.low)
            .filter(|v| !v.is_nan())
            .reduce(f64::min)?;
        let high = self
            .candles
            .iter()
            .map(|c| c.high)
            .filter(|v| !v.is_nan())
            .reduce(f64::max)?;
        Some((low, high))
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = SeriesError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Self::new(candles)
    }
}

impl From<CandleSeries> for Vec<Candle> {
    fn from(series: CandleSeries) -> Self {
        series.candles
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
