// src/core/projector.rs — Flat CSV projection of the report collection

use std::path::Path;

use super::checkpoint::{write_atomic, ReportSet};
use super::types::QualityReport;
use crate::util::flatten_newlines;

/// Column order of the tabular export.
pub const COLUMNS: [&str; 9] = [
    "session_id",
    "model_used",
    "user_satisfaction",
    "bot_accuracy",
    "issue_resolved",
    "chat_complete",
    "quality_score",
    "summary",
    "generated_at",
];

/// Render every report as one fully quoted CSV row under a fixed header.
pub fn project(reports: &ReportSet) -> anyhow::Result<String> {
    let mut out = Vec::with_capacity(64 + reports.len() * 256);
    out.extend_from_slice(COLUMNS.join(",").as_bytes());
    out.push(b'\n');

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    for report in reports.iter() {
        wtr.write_record(row_values(report).iter().map(|v| flatten_newlines(v)))?;
    }
    let out = wtr.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
    Ok(String::from_utf8(out)?)
}

/// Write the projection next to the checkpoint.
pub fn write_csv(reports: &ReportSet, path: &Path) -> anyhow::Result<()> {
    write_atomic(path, project(reports)?.as_bytes())
}

fn row_values(r: &QualityReport) -> [String; 9] {
    [
        r.session_id.clone(),
        r.model_used.clone(),
        r.user_satisfaction.clone().unwrap_or_default(),
        r.bot_accuracy.clone().unwrap_or_default(),
        opt(r.issue_resolved),
        opt(r.chat_complete),
        opt(r.quality_score),
        r.summary.clone().unwrap_or_default(),
        r.generated_at.clone(),
    ]
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}
