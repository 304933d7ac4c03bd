//! Markdown report for one analysis.

use gannigma_core::models::{ModelKind, ModelResult};

use super::format::format_price;
use crate::runner::AnalysisReport;

/// Generate the Markdown report: base data, level columns per model, the
/// prior-period data check, failures and the recent candles.
pub fn generate_report(report: &AnalysisReport) -> String {
    let mut md = String::with_capacity(4096);
    let config = &report.config;

    md.push_str(&format!("# Gannigma Report: {}\n\n", config.ticker));

    // Base data
    md.push_str("## Base Data\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Ticker | {} |\n", config.ticker));
    md.push_str(&format!("| Analysis date | {} |\n", config.analysis_date()));
    md.push_str(&format!("| Mode | {} |\n", config.mode));
    md.push_str(&format!(
        "| Volatility | {} (x{}) |\n",
        config.volatility,
        config.volatility.multiplier()
    ));
    md.push_str(&format!("| ATR period | {} |\n", config.atr_period));
    md.push_str(&format!(
        "| Main rhythm | {} (grid step {}) |\n",
        config.main_rhythm,
        format_price(report.grid_step)
    ));
    if let Some(result) = report.completed().next() {
        md.push_str(&format!(
            "| Reference candle | {} |\n",
            result.reference_candle_date
        ));
        md.push_str(&format!("| Basis | {} |\n", format_price(result.basis)));
        md.push_str(&format!("| ATR | {} |\n", format_price(result.atr_value)));
        md.push_str(&format!(
            "| Range | {} to {} |\n",
            format_price(result.range.lower),
            format_price(result.range.upper)
        ));
    }
    md.push_str(&format!(
        "| Provider | {} ({}) |\n",
        report.provider,
        report.source.label()
    ));
    md.push_str(&format!("| Fingerprint | `{}` |\n", report.short_fingerprint()));

    md.push_str("\n## In-Range Levels\n\n");
    push_level_columns(&mut md, report, |r| &r.in_range_levels);

    md.push_str("\n## Expansion Levels\n\n");
    push_level_columns(&mut md, report, |r| &r.expansion_levels);

    // Data check: which prior period each ladder came from
    let references: Vec<_> = report
        .completed()
        .filter_map(|r| r.ladder.reference.as_ref().map(|p| (r, p)))
        .collect();
    if !references.is_empty() {
        md.push_str("\n## Data Check\n\n");
        md.push_str("| Model | Period | Low | High | Span | Divider | Step |\n");
        md.push_str("| --- | --- | --- | --- | --- | --- | --- |\n");
        for (result, period) in references {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                result.kind.label(),
                period.label,
                format_price(period.low),
                format_price(period.high),
                format_price(period.span),
                period.divider,
                format_price(result.ladder.step)
            ));
        }
    }

    let failures: Vec<_> = report
        .models
        .iter()
        .filter_map(|run| run.error().map(|e| (run.kind, e)))
        .collect();
    if !failures.is_empty() {
        md.push_str("\n## Failures\n\n");
        for (kind, message) in failures {
            md.push_str(&format!("- **{}**: {}\n", kind.label(), message));
        }
    }

    if let Some(result) = report.completed().next() {
        md.push_str("\n## Recent Candles\n\n");
        md.push_str("| Date | Open | High | Low | Close |\n");
        md.push_str("| --- | --- | --- | --- | --- |\n");
        for c in &result.recent_candles {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                c.date,
                format_price(c.open),
                format_price(c.high),
                format_price(c.low),
                format_price(c.close)
            ));
        }
    }

    md
}

/// One column per model; failed models show `failed` in their first row.
fn push_level_columns(
    md: &mut String,
    report: &AnalysisReport,
    levels: impl Fn(&ModelResult) -> &Vec<f64>,
) {
    let columns: Vec<(ModelKind, Option<&Vec<f64>>)> = report
        .models
        .iter()
        .map(|run| (run.kind, run.result().map(&levels)))
        .collect();

    let header: Vec<&str> = columns.iter().map(|(kind, _)| kind.label()).collect();
    md.push_str(&format!("| {} |\n", header.join(" | ")));
    md.push_str(&format!("|{}\n", " --- |".repeat(columns.len())));

    let rows = columns
        .iter()
        .map(|(_, values)| values.map_or(1, |v| v.len()))
        .max()
        .unwrap_or(0);
    for i in 0..rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|(_, values)| match values {
                Some(v) => v.get(i).map(|p| format_price(*p)).unwrap_or_default(),
                None if i == 0 => "failed".to_string(),
                None => String::new(),
            })
            .collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
}
