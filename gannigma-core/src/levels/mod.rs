//! Price-level logic shared by all three models.
//!
//! - `extreme`: reference candle among the last three before the analysis date
//! - `range`: volatility band around the reference candle's midpoint
//! - `sequence`: lazy arithmetic ladders (fixed 360° grid, prior-period ladders)
//! - `intersect`: in-range levels and expansions outside the band

pub mod extreme;
pub mod intersect;
pub mod range;
pub mod sequence;

pub use extreme::{find_extreme_candle, ExtremeCandle, EXTREME_LOOKBACK};
pub use intersect::{intersect, ExpansionPolicy, Intersection, EXPANSION_COUNT};
pub use range::{build_range, VolatilityRange};
pub use sequence::{
    Divider, LevelSequence, PeriodSpan, SequenceError, GRID_CEILING, MAX_SEQUENCE_LEN,
    RANGE_LEVEL_COUNT,
};

/// Number of decimals every generated price is rounded to.
pub const PRICE_DECIMALS: i32 = 4;

/// Round a price to [`PRICE_DECIMALS`] decimals.
pub fn round_price(value: f64) -> f64 {
    let scale = 10f64.powi(PRICE_DECIMALS);
    (value * scale).round() / scale
}
