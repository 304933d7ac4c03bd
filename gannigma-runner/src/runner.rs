//! Analysis runner: one config, three independent models.
//!
//! Two entry points:
//! - `run_analysis()`: validates a config and runs the 360°, prior-year and
//!   prior-month models against one provider. Used by the CLI.
//! - `run_batch()`: many configs in parallel with rayon, input order kept.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gannigma_core::data::{CandleProvider, DataSource};
use gannigma_core::models::{run_model, ModelKind, ModelResult};

use crate::config::{AnalysisConfig, ConfigError};

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// What happened to one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Completed(ModelResult),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRun {
    pub kind: ModelKind,
    pub outcome: ModelOutcome,
}

impl ModelRun {
    pub fn result(&self) -> Option<&ModelResult> {
        match &self.outcome {
            ModelOutcome::Completed(result) => Some(result),
            ModelOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ModelOutcome::Completed(_) => None,
            ModelOutcome::Failed { message } => Some(message),
        }
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub fingerprint: String,
    /// The config with its analysis date pinned.
    pub config: AnalysisConfig,
    pub grid_step: f64,
    pub provider: String,
    pub source: DataSource,
    /// One entry per model, in 360°, prior-year, prior-month order.
    pub models: Vec<ModelRun>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl AnalysisReport {
    pub fn model(&self, kind: ModelKind) -> Option<&ModelRun> {
        self.models.iter().find(|run| run.kind == kind)
    }

    pub fn completed(&self) -> impl Iterator<Item = &ModelResult> {
        self.models.iter().filter_map(ModelRun::result)
    }

    pub fn all_failed(&self) -> bool {
        self.models.iter().all(|run| run.result().is_none())
    }

    /// First 8 hex digits of the fingerprint.
    pub fn short_fingerprint(&self) -> &str {
        self.fingerprint.get(..8).unwrap_or(&self.fingerprint)
    }
}

/// Validate `config` and run all three models.
///
/// A model failure is recorded in its `ModelRun` and never stops the
/// others. Only an invalid config is an error.
pub fn run_analysis(
    config: &AnalysisConfig,
    provider: &dyn CandleProvider,
) -> Result<AnalysisReport, ConfigError> {
    config.validate()?;
    let config = config.resolved();
    let fingerprint = config.fingerprint()?;
    let grid_step = config.grid_step()?;
    let ladders = config.ladders()?;
    let params = config.model_params();

    info!(
        ticker = %params.ticker,
        analysis_date = %params.analysis_date,
        provider = provider.name(),
        "running analysis"
    );

    let models = ladders
        .par_iter()
        .map(|ladder| {
            let kind = ladder.kind();
            let outcome = match run_model(provider, &params, ladder) {
                Ok(result) => ModelOutcome::Completed(result),
                Err(e) => {
                    warn!(%kind, error = %e, "model failed");
                    ModelOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };
            ModelRun { kind, outcome }
        })
        .collect();

    Ok(AnalysisReport {
        schema_version: SCHEMA_VERSION,
        fingerprint,
        config,
        grid_step,
        provider: provider.name().to_string(),
        source: provider.source(),
        models,
    })
}

/// Run many analyses in parallel. Results keep the order of `configs`.
pub fn run_batch(
    configs: &[AnalysisConfig],
    provider: &dyn CandleProvider,
) -> Vec<Result<AnalysisReport, ConfigError>> {
    configs
        .par_iter()
        .map(|config| run_analysis(config, provider))
        .collect()
}
