//! Inputs of a model run.

use super::error::ModelError;
use crate::domain::{SearchMode, VolatilityTier};
use crate::levels::{Divider, ExpansionPolicy};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ATR_PERIOD: usize = 14;

/// Calendar days of history fetched ahead of the ATR warmup.
pub const DEFAULT_DATA_BUFFER_DAYS: u32 = 2000;

/// Extra calendar days added to every fetch window.
pub const FETCH_PADDING_DAYS: i64 = 5;

/// Which level model produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    FixedGrid,
    PriorYear,
    PriorMonth,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::FixedGrid,
        ModelKind::PriorYear,
        ModelKind::PriorMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::FixedGrid => "fixed_grid",
            ModelKind::PriorYear => "prior_year",
            ModelKind::PriorMonth => "prior_month",
        }
    }

    /// Column heading used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::FixedGrid => "360°",
            ModelKind::PriorYear => "Prior year",
            ModelKind::PriorMonth => "Prior month",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a model builds its level sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LadderSpec {
    /// Grid from zero in `step` increments.
    FixedGrid { step: f64 },
    /// 81 levels from last calendar year's low.
    PriorYear { divider: Divider },
    /// 81 levels from the previous calendar month's low.
    PriorMonth { divider: Divider },
}

impl LadderSpec {
    pub fn kind(&self) -> ModelKind {
        match self {
            LadderSpec::FixedGrid { .. } => ModelKind::FixedGrid,
            LadderSpec::PriorYear { .. } => ModelKind::PriorYear,
            LadderSpec::PriorMonth { .. } => ModelKind::PriorMonth,
        }
    }

    pub fn expansion_policy(&self) -> ExpansionPolicy {
        match self {
            LadderSpec::FixedGrid { .. } => ExpansionPolicy::GridMembers,
            LadderSpec::PriorYear { .. } | LadderSpec::PriorMonth { .. } => {
                ExpansionPolicy::SteppedFromAnchor
            }
        }
    }
}

/// Parameters shared by all three models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub ticker: String,
    pub analysis_date: NaiveDate,
    pub mode: SearchMode,
    pub volatility: VolatilityTier,
    pub atr_period: usize,
    pub data_buffer_days: u32,
}

impl ModelParams {
    pub fn new(ticker: impl Into<String>, analysis_date: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            analysis_date,
            mode: SearchMode::SeekHigh,
            volatility: VolatilityTier::Normal,
            atr_period: DEFAULT_ATR_PERIOD,
            data_buffer_days: DEFAULT_DATA_BUFFER_DAYS,
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_volatility(mut self, volatility: VolatilityTier) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn with_atr_period(mut self, period: usize) -> Self {
        self.atr_period = period;
        self
    }

    pub fn with_data_buffer_days(mut self, days: u32) -> Self {
        self.data_buffer_days = days;
        self
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.ticker.trim().is_empty() {
            return Err(ModelError::InvalidParameter("ticker must not be empty".into()));
        }
        if self.atr_period == 0 {
            return Err(ModelError::InvalidParameter(
                "atr_period must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Inclusive fetch window ending on the analysis date.
    pub fn fetch_window(&self) -> Result<(NaiveDate, NaiveDate), ModelError> {
        let days = i64::from(self.data_buffer_days)
            .saturating_add(i64::try_from(self.atr_period).unwrap_or(i64::MAX))
            .saturating_add(FETCH_PADDING_DAYS);
        let start = Duration::try_days(days)
            .and_then(|d| self.analysis_date.checked_sub_signed(d))
            .ok_or_else(|| {
                ModelError::InvalidParameter(format!(
                    "fetch window of {days} days before {} is out of range",
                    self.analysis_date
                ))
            })?;
        Ok((start, self.analysis_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn defaults() {
        let p = ModelParams::new("BTC-USD", d(2024, 3, 15));
        assert_eq!(p.mode, SearchMode::SeekHigh);
        assert_eq!(p.volatility, VolatilityTier::Normal);
        assert_eq!(p.atr_period, 14);
        assert_eq!(p.data_buffer_days, 2000);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn fetch_window_pads_buffer_and_atr() {
        let p = ModelParams::new("X", d(2024, 3, 15))
            .with_atr_period(10)
            .with_data_buffer_days(15);
        // 15 + 10 + 5 = 30 days
        assert_eq!(p.fetch_window().unwrap(), (d(2024, 2, 14), d(2024, 3, 15)));
    }

    #[test]
    fn rejects_zero_period_and_blank_ticker() {
        let p = ModelParams::new("X", d(2024, 1, 1)).with_atr_period(0);
        assert!(matches!(p.validate(), Err(ModelError::InvalidParameter(_))));
        let p = ModelParams::new("  ", d(2024, 1, 1));
        assert!(matches!(p.validate(), Err(ModelError::InvalidParameter(_))));
    }

    #[test]
    fn ladder_policy_follows_kind() {
        let grid = LadderSpec::FixedGrid { step: 45.0 };
        assert_eq!(grid.kind(), ModelKind::FixedGrid);
        assert_eq!(grid.expansion_policy(), ExpansionPolicy::GridMembers);
        let year = LadderSpec::PriorYear {
            divider: Divider::Sixteen,
        };
        assert_eq!(year.kind(), ModelKind::PriorYear);
        assert_eq!(year.expansion_policy(), ExpansionPolicy::SteppedFromAnchor);
    }

    #[test]
    fn ladder_spec_serializes_tagged() {
        let json = serde_json::to_string(&LadderSpec::PriorMonth {
            divider: Divider::Eight,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"prior_month","divider":8}"#);
    }
}
