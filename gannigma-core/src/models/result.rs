//! Model output.

use super::params::ModelKind;
use crate::domain::{Candle, SearchMode, VolatilityTier};
use crate::levels::VolatilityRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The prior period a range-derived ladder was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReference {
    /// `2023` for a prior year, `2024-02` for a prior month.
    pub label: String,
    pub low: f64,
    pub high: f64,
    pub span: f64,
    pub divider: u32,
}

/// Shape of the level sequence a model intersected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderInfo {
    pub start: f64,
    pub step: f64,
    pub len: usize,
    pub reference: Option<PeriodReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub kind: ModelKind,
    pub ticker: String,
    pub analysis_date: NaiveDate,
    pub mode: SearchMode,
    pub volatility: VolatilityTier,
    /// Levels inside the band, descending.
    pub in_range_levels: Vec<f64>,
    /// Up to four levels beyond the band, descending.
    pub expansion_levels: Vec<f64>,
    pub range: VolatilityRange,
    /// Midpoint of the reference candle.
    pub basis: f64,
    pub reference_candle_date: NaiveDate,
    pub atr_value: f64,
    pub ladder: LadderInfo,
    /// Last ten candles before the analysis date, ascending.
    pub recent_candles: Vec<Candle>,
}

