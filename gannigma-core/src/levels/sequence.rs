//! Arithmetic level sequences.
//!
//! A `LevelSequence` is described by `(start, step, len)` and evaluated on
//! demand: element `i` is `round_price(start + i * step)`. The fixed 360° grid
//! with a small divisor has tens of millions of levels, so nothing is
//! materialized unless a caller asks for `to_vec`.

use super::{round_price, PRICE_DECIMALS};
use crate::domain::CandleSeries;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

/// Upper bound of the fixed grid.
pub const GRID_CEILING: f64 = 500_000.0;

/// Levels in a range-derived ladder (indices 0..=80).
pub const RANGE_LEVEL_COUNT: usize = 81;

/// Refuse to describe ladders denser than this.
pub const MAX_SEQUENCE_LEN: usize = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceError {
    #[error("step must be finite and at least one price tick, got {0}")]
    InvalidStep(f64),

    #[error("start must be finite, got {0}")]
    InvalidStart(f64),

    #[error("degenerate span: high {high} is not above low {low}")]
    DegenerateSpan { low: f64, high: f64 },

    #[error("sequence too dense: {levels} levels exceeds the limit of {limit}")]
    TooDense { levels: f64, limit: usize },
}

/// Granularity of a range-derived ladder: the period span is split into
/// this many steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Divider {
    Eight,
    #[default]
    Sixteen,
}

impl Divider {
    pub fn value(self) -> u32 {
        match self {
            Divider::Eight => 8,
            Divider::Sixteen => 16,
        }
    }
}

impl TryFrom<u32> for Divider {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(Divider::Eight),
            16 => Ok(Divider::Sixteen),
            other => Err(format!("divider must be 8 or 16, got {other}")),
        }
    }
}

impl From<Divider> for u32 {
    fn from(divider: Divider) -> Self {
        divider.value()
    }
}

/// Low/high extremes of a reference period (prior month or prior year).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub low: f64,
    pub high: f64,
}

impl PeriodSpan {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Lowest low and highest high of the series; `None` when it is empty.
    pub fn from_series(series: &CandleSeries) -> Option<Self> {
        series
            .low_high()
            .map(|(low, high)| Self::new(low, high))
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// Ladder step for `divider`, rounded to price precision.
    pub fn step(&self, divider: Divider) -> Result<f64, SequenceError> {
        let span = self.span();
        // NaN spans fail here too.
        if !(span > 0.0) {
            return Err(SequenceError::DegenerateSpan {
                low: self.low,
                high: self.high,
            });
        }
        Ok(round_price(span / f64::from(divider.value())))
    }
}

/// Lazily evaluated arithmetic sequence of price levels, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSequence {
    start: f64,
    step: f64,
    len: usize,
}

impl LevelSequence {
    /// Exactly `count` levels from `start`.
    pub fn with_count(start: f64, step: f64, count: usize) -> Result<Self, SequenceError> {
        validate(start, step)?;
        if count > MAX_SEQUENCE_LEN {
            return Err(SequenceError::TooDense {
                levels: count as f64,
                limit: MAX_SEQUENCE_LEN,
            });
        }
        Ok(Self {
            start,
            step,
            len: count,
        })
    }

    /// Every level from `start` that does not exceed `ceiling`.
    pub fn up_to(start: f64, step: f64, ceiling: f64) -> Result<Self, SequenceError> {
        validate(start, step)?;
        if !(ceiling >= start) {
            return Ok(Self { start, step, len: 0 });
        }

        let levels = ((ceiling - start) / step).floor() + 1.0;
        if levels > MAX_SEQUENCE_LEN as f64 {
            return Err(SequenceError::TooDense {
                levels,
                limit: MAX_SEQUENCE_LEN,
            });
        }

        let mut seq = Self {
            start,
            step,
            len: levels as usize,
        };
        // Float division can land one level off at an exact multiple.
        while seq.len > 0 && seq.value(seq.len - 1) > ceiling {
            seq.len -= 1;
        }
        while seq.value(seq.len) <= ceiling {
            seq.len += 1;
        }
        Ok(seq)
    }

    /// The 360° grid: from zero up to [`GRID_CEILING`] in `step` increments.
    pub fn fixed_grid(step: f64) -> Result<Self, SequenceError> {
        Self::up_to(0.0, step, GRID_CEILING)
    }

    /// Prior-period ladder: [`RANGE_LEVEL_COUNT`] levels from the period low in
    /// steps of `span / divider`.
    pub fn range_derived(span: PeriodSpan, divider: Divider) -> Result<Self, SequenceError> {
        let step = span.step(divider)?;
        Self::with_count(span.low, step, RANGE_LEVEL_COUNT)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        (index < self.len).then(|| self.value(index))
    }

    pub fn first(&self) -> Option<f64> {
        self.get(0)
    }

    pub fn last(&self) -> Option<f64> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> {
        let seq = *self;
        (0..self.len).map(move |i| seq.value(i))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Index of the first level `>= bound` (`len` if none).
    pub fn first_at_or_above(&self, bound: f64) -> usize {
        self.partition(|v| v < bound)
    }

    /// Index of the first level `> bound` (`len` if none).
    pub fn first_above(&self, bound: f64) -> usize {
        self.partition(|v| v <= bound)
    }

    /// Indices of all levels inside `[lower, upper]`.
    pub fn indices_within(&self, lower: f64, upper: f64) -> Range<usize> {
        let lo = self.first_at_or_above(lower);
        let hi = self.first_above(upper).max(lo);
        lo..hi
    }

    fn value(&self, index: usize) -> f64 {
        round_price(self.start + index as f64 * self.step)
    }

    /// First index where `pred` stops holding; `pred` must hold on a prefix.
    fn partition(&self, pred: impl Fn(f64) -> bool) -> usize {
        let (mut lo, mut hi) = (0usize, self.len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(self.value(mid)) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

fn validate(start: f64, step: f64) -> Result<(), SequenceError> {
    if !start.is_finite() {
        return Err(SequenceError::InvalidStart(start));
    }
    let ticks = step * 10f64.powi(PRICE_DECIMALS);
    if !step.is_finite() || ticks < 1.0 - 1e-9 {
        return Err(SequenceError::InvalidStep(step));
    }
    Ok(())
}
