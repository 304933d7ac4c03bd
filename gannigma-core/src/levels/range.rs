//! Volatility range around the reference candle.

use super::round_price;
use crate::domain::{Candle, SearchMode};
use serde::{Deserialize, Serialize};

/// Closed price interval `[lower, upper]` with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRange {
    pub lower: f64,
    pub upper: f64,
}

impl VolatilityRange {
    /// Returns `None` unless both bounds are finite and ordered.
    pub fn new(lower: f64, upper: f64) -> Option<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return None;
        }
        Some(Self { lower, upper })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Build the band from the reference candle's midpoint and `atr * multiplier`.
///
/// `SeekHigh`: `[basis, basis + atr*m]`. `SeekLow`: `[basis - atr*m, basis]`.
/// Both bounds are rounded to four decimals. Returns `None` for non-finite
/// input or a negative offset.
pub fn build_range(
    extreme: &Candle,
    atr: f64,
    multiplier: f64,
    mode: SearchMode,
) -> Option<VolatilityRange> {
    let basis = extreme.midpoint();
    let offset = atr * multiplier;
    if !basis.is_finite() || !offset.is_finite() || offset < 0.0 {
        return None;
    }

    let (lower, upper) = match mode {
        SearchMode::SeekHigh => (basis, basis + offset),
        SearchMode::SeekLow => (basis - offset, basis),
    };
    VolatilityRange::new(round_price(lower), round_price(upper))
}
