// src/cli/export.rs — `chatqa export`: re-render the checkpoint
//
// The checkpoint stays the source of truth; this only re-projects it.

use std::path::PathBuf;

use crate::core::checkpoint::{CheckpointStore, ReportSet};
use crate::core::projector;
use crate::infra::config::Config;

/// Render `reports` in the requested format.
pub fn render(reports: &ReportSet, format: &str) -> anyhow::Result<String> {
    let out = match format {
        "csv" => projector::project(reports)?,
        "json" => serde_json::to_string_pretty(reports.as_slice())?,
        "yaml" | "yml" => serde_yml::to_string(reports.as_slice())?,
        other => {
            anyhow::bail!("Unsupported format '{}'. Options: csv, json, yaml", other);
        }
    };
    Ok(out)
}

pub fn run_export(
    config: &Config,
    output: Option<&str>,
    format: &str,
    to: Option<&str>,
) -> anyhow::Result<()> {
    let checkpoint = output
        .map(PathBuf::from)
        .unwrap_or_else(|| config.batch.output_json.clone());
    let reports = CheckpointStore::new(&checkpoint).load();
    if reports.is_empty() {
        anyhow::bail!(
            "No reports found in {}. Run `chatqa run` first.",
            checkpoint.display()
        );
    }

    let rendered = render(&reports, format)?;
    if let Some(path) = to {
        std::fs::write(path, &rendered)?;
        eprintln!("Exported {} reports to {}", reports.len(), path);
    } else {
        print!("{}", rendered);
    }
    Ok(())
}
