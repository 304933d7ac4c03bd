//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR is the simple moving average of the trailing `period` true ranges.
//! The first candle has no previous close, so its true range is high-low and
//! the first defined ATR sits at index `period - 1`.

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    /// Callers validate `period >= 1` before constructing; zero is a programming error.
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// Compute the True Range series from candles.
/// TR[0] = high[0]-low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    let mut tr = vec![f64::NAN; candles.len()];

    if let Some(first) = candles.first() {
        if first.high.is_finite() && first.low.is_finite() {
            tr[0] = first.high - first.low;
        }
    }

    for (i, pair) in candles.windows(2).enumerate() {
        let h = pair[1].high;
        let l = pair[1].low;
        let pc = pair[0].close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i + 1] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let tr = true_range(candles);
        let mut result = vec![f64::NAN; candles.len()];

        if tr.len() < self.period {
            return result;
        }

        // A window containing any NaN stays NaN.
        for (offset, window) in tr.windows(self.period).enumerate() {
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }
            result[offset + self.period - 1] = window.iter().sum::<f64>() / self.period as f64;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let candles = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = high - low = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&candles);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let candles = make_candles(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range(&candles);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3_is_simple_average() {
        let candles = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = Atr::new(3).compute(&candles);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // ATR[2] = mean(10, 8, 9), ATR[3] = mean(8, 9, 6), ATR[4] = mean(9, 6, 6)
        assert_approx(result[2], 9.0, DEFAULT_EPSILON);
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn current_needs_period_candles() {
        let data: Vec<_> = (0..13)
            .map(|i| {
                let base = 100.0 + i as f64;
                (base, base + 2.0, base - 2.0, base + 1.0)
            })
            .collect();
        let candles = make_candles(&data);
        let atr = Atr::new(14);
        assert!(atr.current(&candles).is_none());

        let mut more = data.clone();
        more.push((113.0, 115.0, 111.0, 114.0));
        assert!(atr.current(&make_candles(&more)).is_some());

        let three = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
        ]);
        assert_approx(Atr::new(3).current(&three).unwrap(), 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_nan_propagation() {
        let mut candles = make_candles(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
        ]);
        candles[2].high = f64::NAN;
        let result = Atr::new(2).compute(&candles);
        // Windows ending at 2 and 3 both include TR[2] = NaN
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(Atr::new(2).current(&candles).is_none());
    }

    #[test]
    fn void_first_candle_has_no_true_range() {
        let mut candles = make_candles(&[(100.0, 105.0, 95.0, 102.0), (102.0, 108.0, 100.0, 106.0)]);
        candles[0].low = f64::NAN;
        let tr = true_range(&candles);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_lookback_and_name() {
        let atr = Atr::new(14);
        assert_eq!(atr.lookback(), 14);
        assert_eq!(atr.name(), "atr_14");
    }

    #[test]
    fn empty_input() {
        assert!(Atr::new(3).compute(&[]).is_empty());
    }
}
