//! Serializable analysis configuration.
//!
//! Loaded from TOML; every field has a default, so an empty file describes
//! a BTC-USD analysis for today with the 360 rhythm.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gannigma_core::domain::{SearchMode, VolatilityTier};
use gannigma_core::levels::Divider;
use gannigma_core::models::{
    LadderSpec, ModelParams, DEFAULT_ATR_PERIOD, DEFAULT_DATA_BUFFER_DAYS,
};

use crate::rhythm::{MainRhythm, BASE_SMALL_DIVISORS, DEFAULT_SMALL_DIVISOR_INDEX};

pub const DEFAULT_TICKER: &str = "BTC-USD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub ticker: String,
    /// `None` means today (local time).
    pub analysis_date: Option<NaiveDate>,
    pub mode: SearchMode,
    pub volatility: VolatilityTier,
    /// The low tier is only accepted when this is set.
    pub allow_low_volatility: bool,
    pub atr_period: usize,
    /// Calendar days of history fetched ahead of the ATR warmup.
    pub data_buffer: u32,
    pub main_rhythm: MainRhythm,
    pub small_divisor_index: usize,
    pub year_divider: Divider,
    pub month_divider: Divider,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ticker: DEFAULT_TICKER.to_string(),
            analysis_date: None,
            mode: SearchMode::SeekHigh,
            volatility: VolatilityTier::Normal,
            allow_low_volatility: false,
            atr_period: DEFAULT_ATR_PERIOD,
            data_buffer: DEFAULT_DATA_BUFFER_DAYS,
            main_rhythm: MainRhythm::default(),
            small_divisor_index: DEFAULT_SMALL_DIVISOR_INDEX,
            year_divider: Divider::default(),
            month_divider: Divider::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn new(ticker: impl Into<String>, analysis_date: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            analysis_date: Some(analysis_date),
            ..Self::default()
        }
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("ticker must not be empty".into()));
        }
        if self.atr_period == 0 {
            return Err(ConfigError::Invalid("atr_period must be at least 1".into()));
        }
        if self.volatility == VolatilityTier::Low && !self.allow_low_volatility {
            return Err(ConfigError::Invalid(
                "volatility 'low' requires allow_low_volatility = true".into(),
            ));
        }
        if self.small_divisor_index >= BASE_SMALL_DIVISORS.len() {
            return Err(ConfigError::Invalid(format!(
                "small_divisor_index {} out of range (0..={})",
                self.small_divisor_index,
                BASE_SMALL_DIVISORS.len() - 1
            )));
        }
        Ok(())
    }

    /// Copy with the analysis date pinned (today when unset).
    pub fn resolved(&self) -> Self {
        Self {
            analysis_date: Some(self.analysis_date()),
            ..self.clone()
        }
    }

    pub fn analysis_date(&self) -> NaiveDate {
        self.analysis_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Step of the 360° grid for the configured rhythm and divisor.
    pub fn grid_step(&self) -> Result<f64, ConfigError> {
        self.main_rhythm
            .small_divisor(self.small_divisor_index)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "small_divisor_index {} out of range",
                    self.small_divisor_index
                ))
            })
    }

    pub fn model_params(&self) -> ModelParams {
        ModelParams::new(self.ticker.trim().to_ascii_uppercase(), self.analysis_date())
            .with_mode(self.mode)
            .with_volatility(self.volatility)
            .with_atr_period(self.atr_period)
            .with_data_buffer_days(self.data_buffer)
    }

    /// Ladders for the 360°, prior-year and prior-month models, in that order.
    pub fn ladders(&self) -> Result<[LadderSpec; 3], ConfigError> {
        Ok([
            LadderSpec::FixedGrid {
                step: self.grid_step()?,
            },
            LadderSpec::PriorYear {
                divider: self.year_divider,
            },
            LadderSpec::PriorMonth {
                divider: self.month_divider,
            },
        ])
    }

    /// Content hash of the resolved config.
    ///
    /// Two analyses with identical settings share a fingerprint, which names
    /// their artifact directory.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(&self.resolved())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
