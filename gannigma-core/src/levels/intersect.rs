//! Intersect a level sequence with a volatility range.
//!
//! In-range levels are the sequence members inside the band. Expansions are
//! up to four levels just beyond the band in the search direction, chosen one
//! of two ways:
//! - `GridMembers`: the nearest existing members of the (dense) sequence.
//! - `SteppedFromAnchor`: computed by stepping outward from the outermost
//!   in-range level (or the band edge when nothing is in range). Used for the
//!   81-level prior-period ladders, which may end before the band does.

use super::range::VolatilityRange;
use super::round_price;
use super::sequence::LevelSequence;
use crate::domain::SearchMode;
use serde::{Deserialize, Serialize};

/// Number of expansion levels reported per model.
pub const EXPANSION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    GridMembers,
    SteppedFromAnchor,
}

/// In-range and expansion levels, both sorted descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub in_range: Vec<f64>,
    pub expansions: Vec<f64>,
}

pub fn intersect(
    sequence: &LevelSequence,
    range: &VolatilityRange,
    mode: SearchMode,
    policy: ExpansionPolicy,
) -> Intersection {
    let inside = sequence.indices_within(range.lower, range.upper);
    let in_range: Vec<f64> = inside
        .clone()
        .rev()
        .filter_map(|i| sequence.get(i))
        .collect();

    let expansions = match policy {
        ExpansionPolicy::GridMembers => {
            let indices = match mode {
                SearchMode::SeekHigh => {
                    inside.end..(inside.end + EXPANSION_COUNT).min(sequence.len())
                }
                SearchMode::SeekLow => inside.start.saturating_sub(EXPANSION_COUNT)..inside.start,
            };
            indices.rev().filter_map(|i| sequence.get(i)).collect()
        }
        ExpansionPolicy::SteppedFromAnchor => {
            stepped_expansions(sequence.step(), range, &in_range, mode)
        }
    };

    Intersection {
        in_range,
        expansions,
    }
}

/// Walk outward from the anchor in `step` increments. Steps that land back
/// inside the band are skipped.
fn stepped_expansions(
    step: f64,
    range: &VolatilityRange,
    in_range: &[f64],
    mode: SearchMode,
) -> Vec<f64> {
    let mut levels = Vec::with_capacity(EXPANSION_COUNT);
    if !(step > 0.0) {
        return levels;
    }

    match mode {
        SearchMode::SeekHigh => {
            let anchor = in_range.first().copied().unwrap_or(range.upper);
            let first = first_outside_step(range.upper - anchor, step);
            for k in first..first + EXPANSION_COUNT + 2 {
                let level = round_price(anchor + k as f64 * step);
                if level > range.upper {
                    levels.push(level);
                }
                if levels.len() == EXPANSION_COUNT {
                    break;
                }
            }
            levels.reverse();
        }
        SearchMode::SeekLow => {
            let anchor = in_range.last().copied().unwrap_or(range.lower);
            let first = first_outside_step(anchor - range.lower, step);
            for k in first..first + EXPANSION_COUNT + 2 {
                let level = round_price(anchor - k as f64 * step);
                if level < range.lower {
                    levels.push(level);
                }
                if levels.len() == EXPANSION_COUNT {
                    break;
                }
            }
        }
    }

    levels
}

/// Smallest step count (>= 1) that moves past `distance` to the band edge.
fn first_outside_step(distance: f64, step: f64) -> usize {
    if distance <= 0.0 {
        return 1;
    }
    (distance / step).floor() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::sequence::{Divider, PeriodSpan};

    fn range(lower: f64, upper: f64) -> VolatilityRange {
        VolatilityRange::new(lower, upper).unwrap()
    }

    #[test]
    fn grid_seek_high() {
        let grid = LevelSequence::fixed_grid(22.5).unwrap();
        let result = intersect(
            &grid,
            &range(100.0, 140.0),
            SearchMode::SeekHigh,
            ExpansionPolicy::GridMembers,
        );
        assert_eq!(result.in_range, vec![135.0, 112.5]);
        assert_eq!(result.expansions, vec![225.0, 202.5, 180.0, 157.5]);
    }

    #[test]
    fn grid_seek_low() {
        let grid = LevelSequence::fixed_grid(22.5).unwrap();
        let result = intersect(
            &grid,
            &range(100.0, 140.0),
            SearchMode::SeekLow,
            ExpansionPolicy::GridMembers,
        );
        assert_eq!(result.in_range, vec![135.0, 112.5]);
        assert_eq!(result.expansions, vec![90.0, 67.5, 45.0, 22.5]);
    }

    #[test]
    fn grid_bounds_are_inclusive() {
        let grid = LevelSequence::fixed_grid(22.5).unwrap();
        let result = intersect(
            &grid,
            &range(112.5, 135.0),
            SearchMode::SeekHigh,
            ExpansionPolicy::GridMembers,
        );
        assert_eq!(result.in_range, vec![135.0, 112.5]);
        assert_eq!(result.expansions[3], 157.5);
    }

    #[test]
    fn grid_seek_low_near_zero_truncates() {
        let grid = LevelSequence::fixed_grid(22.5).unwrap();
        let result = intersect(
            &grid,
            &range(50.0, 60.0),
            SearchMode::SeekLow,
            ExpansionPolicy::GridMembers,
        );
        assert!(result.in_range.is_empty());
        assert_eq!(result.expansions, vec![45.0, 22.5, 0.0]);
    }

    #[test]
    fn grid_seek_high_at_ceiling_truncates() {
        let grid = LevelSequence::fixed_grid(50.0).unwrap();
        let result = intersect(
            &grid,
            &range(499_880.0, 499_900.0),
            SearchMode::SeekHigh,
            ExpansionPolicy::GridMembers,
        );
        assert_eq!(result.in_range, vec![499_900.0]);
        assert_eq!(result.expansions, vec![500_000.0, 499_950.0]);
    }

    #[test]
    fn stepped_from_in_range_max() {
        let ladder =
            LevelSequence::range_derived(PeriodSpan::new(50.0, 130.0), Divider::Eight).unwrap();
        let result = intersect(
            &ladder,
            &range(85.0, 95.0),
            SearchMode::SeekHigh,
            ExpansionPolicy::SteppedFromAnchor,
        );
        assert_eq!(result.in_range, vec![90.0]);
        assert_eq!(result.expansions, vec![130.0, 120.0, 110.0, 100.0]);
    }

    #[test]
    fn stepped_from_upper_bound_without_in_range() {
        let ladder =
            LevelSequence::range_derived(PeriodSpan::new(50.0, 130.0), Divider::Eight).unwrap();
        let result = intersect(
            &ladder,
            &range(91.0, 95.0),
            SearchMode::SeekHigh,
            ExpansionPolicy::SteppedFromAnchor,
        );
        assert!(result.in_range.is_empty());
        assert_eq!(result.expansions, vec![135.0, 125.0, 115.0, 105.0]);
    }

    #[test]
    fn stepped_seek_low_from_in_range_min() {
        let ladder =
            LevelSequence::range_derived(PeriodSpan::new(50.0, 130.0), Divider::Eight).unwrap();
        let result = intersect(
            &ladder,
            &range(75.0, 95.0),
            SearchMode::SeekLow,
            ExpansionPolicy::SteppedFromAnchor,
        );
        assert_eq!(result.in_range, vec![90.0, 80.0]);
        assert_eq!(result.expansions, vec![70.0, 60.0, 50.0, 40.0]);
    }

    #[test]
    fn stepped_seek_low_from_lower_bound() {
        let ladder =
            LevelSequence::range_derived(PeriodSpan::new(50.0, 130.0), Divider::Eight).unwrap();
        let result = intersect(
            &ladder,
            &range(20.0, 45.0),
            SearchMode::SeekLow,
            ExpansionPolicy::SteppedFromAnchor,
        );
        assert!(result.in_range.is_empty());
        assert_eq!(result.expansions, vec![10.0, 0.0, -10.0, -20.0]);
    }

    #[test]
    fn stepped_skips_levels_inside_band_past_ladder_end() {
        // Ladder ends at 850; the band reaches far beyond it.
        let ladder =
            LevelSequence::range_derived(PeriodSpan::new(50.0, 130.0), Divider::Eight).unwrap();
        let band = range(845.0, 1000.0);
        let result = intersect(
            &ladder,
            &band,
            SearchMode::SeekHigh,
            ExpansionPolicy::SteppedFromAnchor,
        );
        assert_eq!(result.in_range, vec![850.0]);
        assert_eq!(result.expansions, vec![1040.0, 1030.0, 1020.0, 1010.0]);
        assert!(result.expansions.iter().all(|v| !band.contains(*v)));
    }
}
