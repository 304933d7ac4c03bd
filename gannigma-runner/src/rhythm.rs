//! Main rhythm and small-divisor table for the 360° grid.
//!
//! The base table is defined for rhythm 360 and scales linearly with the
//! rhythm, so "3600" multiplies every step by ten and "0,36" divides by a
//! thousand. Each scaled step is rounded to four decimals on its exact
//! binary value, so `11.25 * 0.001` (stored just below 0.01125) gives 0.0112.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Small divisors at rhythm 360.
pub const BASE_SMALL_DIVISORS: [f64; 6] = [180.0, 90.0, 45.0, 22.5, 11.25, 5.625];

/// Default index into [`BASE_SMALL_DIVISORS`] (45 at rhythm 360).
pub const DEFAULT_SMALL_DIVISOR_INDEX: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MainRhythm {
    ZeroPoint36,
    ThreePoint6,
    ThirtySix,
    #[default]
    ThreeSixty,
    ThirtySixHundred,
}

impl MainRhythm {
    pub const ALL: [MainRhythm; 5] = [
        MainRhythm::ZeroPoint36,
        MainRhythm::ThreePoint6,
        MainRhythm::ThirtySix,
        MainRhythm::ThreeSixty,
        MainRhythm::ThirtySixHundred,
    ];

    pub fn value(self) -> f64 {
        match self {
            MainRhythm::ZeroPoint36 => 0.36,
            MainRhythm::ThreePoint6 => 3.6,
            MainRhythm::ThirtySix => 36.0,
            MainRhythm::ThreeSixty => 360.0,
            MainRhythm::ThirtySixHundred => 3600.0,
        }
    }

    /// Display label with a decimal comma, e.g. `0,36`.
    pub fn label(self) -> &'static str {
        match self {
            MainRhythm::ZeroPoint36 => "0,36",
            MainRhythm::ThreePoint6 => "3,6",
            MainRhythm::ThirtySix => "36",
            MainRhythm::ThreeSixty => "360",
            MainRhythm::ThirtySixHundred => "3600",
        }
    }

    /// The base table scaled to this rhythm, rounded to four decimals.
    pub fn small_divisors(self) -> Vec<f64> {
        let factor = self.value() / 360.0;
        BASE_SMALL_DIVISORS
            .iter()
            .map(|base| round_exact(base * factor))
            .collect()
    }

    pub fn small_divisor(self, index: usize) -> Option<f64> {
        self.small_divisors().get(index).copied()
    }
}

/// Four-decimal rounding of the exact binary value.
///
/// `round_price` scales by 10^4 first, which can turn a value stored just
/// below a half into an exact half and round it up.
fn round_exact(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

impl fmt::Display for MainRhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MainRhythm {
    type Err = String;

    /// Accepts decimal commas or points: `0,36`, `0.36`, `3,6`, `3.6`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('.', ",").as_str() {
            "0,36" => Ok(MainRhythm::ZeroPoint36),
            "3,6" => Ok(MainRhythm::ThreePoint6),
            "36" => Ok(MainRhythm::ThirtySix),
            "360" => Ok(MainRhythm::ThreeSixty),
            "3600" => Ok(MainRhythm::ThirtySixHundred),
            _ => Err(format!(
                "unknown main rhythm '{}'. Valid: 0,36, 3,6, 36, 360, 3600",
                s.trim()
            )),
        }
    }
}

impl TryFrom<String> for MainRhythm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MainRhythm> for String {
    fn from(rhythm: MainRhythm) -> Self {
        rhythm.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rhythm_uses_base_table() {
        let divisors = MainRhythm::default().small_divisors();
        assert_eq!(divisors, BASE_SMALL_DIVISORS.to_vec());
        assert_eq!(
            MainRhythm::default().small_divisor(DEFAULT_SMALL_DIVISOR_INDEX),
            Some(45.0)
        );
    }

    #[test]
    fn scaled_tables_are_rounded() {
        assert_eq!(
            MainRhythm::ThirtySixHundred.small_divisors(),
            vec![1800.0, 900.0, 450.0, 225.0, 112.5, 56.25]
        );
        assert_eq!(
            MainRhythm::ZeroPoint36.small_divisors(),
            vec![0.18, 0.09, 0.045, 0.0225, 0.0112, 0.0056]
        );
        assert_eq!(
            MainRhythm::ThreePoint6.small_divisors(),
            vec![1.8, 0.9, 0.45, 0.225, 0.1125, 0.0563]
        );
    }

    #[test]
    fn stored_below_half_rounds_down() {
        // 11.25 * (0.36 / 360) is just below 0.01125
        assert_eq!(MainRhythm::ZeroPoint36.small_divisor(4), Some(0.0112));
        // 5.625 * (3.6 / 360) is just above 0.05625
        assert_eq!(MainRhythm::ThreePoint6.small_divisor(5), Some(0.0563));
        assert_eq!(MainRhythm::ThirtySix.small_divisor(5), Some(0.5625));
    }

    #[test]
    fn parses_comma_and_point() {
        assert_eq!("0,36".parse::<MainRhythm>(), Ok(MainRhythm::ZeroPoint36));
        assert_eq!("3.6".parse::<MainRhythm>(), Ok(MainRhythm::ThreePoint6));
        assert_eq!(" 360 ".parse::<MainRhythm>(), Ok(MainRhythm::ThreeSixty));
        assert!("720".parse::<MainRhythm>().is_err());
    }

    #[test]
    fn out_of_range_index() {
        assert_eq!(MainRhythm::ThreeSixty.small_divisor(6), None);
    }
}
