//! Search direction and volatility tier selections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of the level search.
///
/// `SeekHigh` anchors the band at the extreme candle's midpoint and extends it
/// upward; `SeekLow` extends it downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[serde(alias = "hoch", alias = "high")]
    SeekHigh,
    #[serde(alias = "tief", alias = "low")]
    SeekLow,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::SeekHigh => "seek_high",
            SearchMode::SeekLow => "seek_low",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seek_high" | "high" | "hoch" => Ok(SearchMode::SeekHigh),
            "seek_low" | "low" | "tief" => Ok(SearchMode::SeekLow),
            other => Err(format!(
                "unknown search mode '{other}'. Valid: seek_high, seek_low"
            )),
        }
    }
}

/// Volatility tier selecting the ATR multiplier for the band width.
///
/// `Low` exists in the table but must be enabled explicitly by the caller's
/// configuration before it may be selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityTier {
    #[serde(alias = "gering")]
    Low,
    #[default]
    Normal,
    #[serde(alias = "hoch")]
    High,
}

impl VolatilityTier {
    pub fn multiplier(&self) -> f64 {
        match self {
            VolatilityTier::Low => 0.5,
            VolatilityTier::Normal => 1.0,
            VolatilityTier::High => 1.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VolatilityTier::Low => "low",
            VolatilityTier::Normal => "normal",
            VolatilityTier::High => "high",
        }
    }
}

impl fmt::Display for VolatilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolatilityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "gering" => Ok(VolatilityTier::Low),
            "normal" => Ok(VolatilityTier::Normal),
            "high" | "hoch" => Ok(VolatilityTier::High),
            other => Err(format!(
                "unknown volatility tier '{other}'. Valid: normal, high, low"
            )),
        }
    }
}
