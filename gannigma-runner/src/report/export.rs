//! Artifact export: JSON report, levels CSV, Markdown.
//!
//! All persisted reports carry a `schema_version`. Unknown versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::markdown::generate_report;
use crate::runner::{AnalysisReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisReport` to pretty JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Deserialize an `AnalysisReport`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Every reported level as `model,kind,price` rows.
///
/// `kind` is `in_range` or `expansion`; failed models contribute no rows.
pub fn export_levels_csv(report: &AnalysisReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["model", "kind", "price"])?;

    for result in report.completed() {
        let model = result.kind.as_str();
        for price in &result.in_range_levels {
            wtr.write_record([model, "in_range", &format!("{price:.4}")])?;
        }
        for price in &result.expansion_levels {
            wtr.write_record([model, "expansion", &format!("{price:.4}")])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Directory name for a report: `{ticker}_{date}_{fingerprint8}`.
pub fn artifact_dir_name(report: &AnalysisReport) -> String {
    let ticker: String = report
        .config
        .ticker
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_') {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}_{}_{}",
        ticker,
        report.config.analysis_date(),
        report.short_fingerprint()
    )
}

/// Save the artifact set for one analysis under `output_dir`.
///
/// Creates `{ticker}_{date}_{fingerprint8}/` containing:
/// - `report.json`: the full `AnalysisReport`
/// - `levels.csv`: every reported level
/// - `report.md`: the Markdown report
///
/// Returns the path to the created directory. Re-running an identical
/// analysis overwrites the same directory.
pub fn save_artifacts(report: &AnalysisReport, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(artifact_dir_name(report));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    write(&run_dir.join("report.json"), &json)?;

    let levels = export_levels_csv(report)?;
    write(&run_dir.join("levels.csv"), &levels)?;

    write(&run_dir.join("report.md"), &generate_report(report))?;

    Ok(run_dir)
}

/// Load an `AnalysisReport` from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
