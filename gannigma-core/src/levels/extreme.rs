//! Extreme candle selection.

use crate::domain::{Candle, CandleSeries, SearchMode};
use serde::{Deserialize, Serialize};

/// Number of trailing candles considered for the reference candle.
pub const EXTREME_LOOKBACK: usize = 3;

/// The reference candle and its position in the series it was picked from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeCandle {
    pub index: usize,
    pub candle: Candle,
}

/// Pick the candle with the highest high (`SeekHigh`) or lowest low
/// (`SeekLow`) among the last [`EXTREME_LOOKBACK`] candles.
///
/// Exact ties resolve to the earliest candle. A candle without a finite
/// midpoint (void in `high` or `low`) never wins, since the range is built
/// from it. Returns `None` when fewer than three candles exist or none of the
/// three qualifies.
pub fn find_extreme_candle(series: &CandleSeries, mode: SearchMode) -> Option<ExtremeCandle> {
    if series.len() < EXTREME_LOOKBACK {
        return None;
    }

    let offset = series.len() - EXTREME_LOOKBACK;
    let mut best: Option<ExtremeCandle> = None;

    for (i, candle) in series.tail(EXTREME_LOOKBACK).iter().enumerate() {
        let value = match mode {
            SearchMode::SeekHigh => candle.high,
            SearchMode::SeekLow => candle.low,
        };
        if value.is_nan() || !candle.midpoint().is_finite() {
            continue;
        }
        let better = match best {
            None => true,
            Some(current) => match mode {
                SearchMode::SeekHigh => value > current.candle.high,
                SearchMode::SeekLow => value < current.candle.low,
            },
        };
        if better {
            best = Some(ExtremeCandle {
                index: offset + i,
                candle: *candle,
            });
        }
    }

    best
}
