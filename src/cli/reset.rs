// src/cli/reset.rs — `chatqa reset`: forget reports so they are re-attempted

use std::path::PathBuf;

use crate::core::checkpoint::{CheckpointStore, ReportSet};
use crate::core::projector;
use crate::infra::config::Config;

/// Drop error reports and/or specific sessions. Returns the number removed.
pub fn forget(reports: &mut ReportSet, errors: bool, sessions: &[String]) -> usize {
    reports.retain(|r| !(errors && r.is_error()) && !sessions.contains(&r.session_id))
}

pub fn run_reset(
    config: &Config,
    output: Option<&str>,
    errors: bool,
    sessions: &[String],
) -> anyhow::Result<()> {
    if !errors && sessions.is_empty() {
        anyhow::bail!("Nothing to reset. Pass --errors and/or --session <ID>.");
    }

    let checkpoint = output
        .map(PathBuf::from)
        .unwrap_or_else(|| config.batch.output_json.clone());
    let store = CheckpointStore::new(&checkpoint);
    let mut reports = store.load();

    let removed = forget(&mut reports, errors, sessions);
    if removed == 0 {
        eprintln!("No matching reports in {}", checkpoint.display());
        return Ok(());
    }

    store.save(&reports)?;
    projector::write_csv(&reports, &config.batch.output_csv)?;
    tracing::info!(removed, "checkpoint entries reset");
    eprintln!(
        "Removed {} report(s); they will be re-evaluated on the next run.",
        removed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{QualityReport, RawReport};
    use crate::infra::errors::ChatQaError;

    fn set() -> ReportSet {
        let err = ChatQaError::Transport {
            endpoint: "x".into(),
            message: "down".into(),
        };
        [
            QualityReport::from_raw("ok-1", RawReport::default(), "qwen3:8b", "t"),
            QualityReport::failure("bad-1", &err, "t"),
            QualityReport::from_raw("ok-2", RawReport::default(), "llama3", "t"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_forget_errors() {
        let mut r = set();
        assert_eq!(forget(&mut r, true, &[]), 1);
        assert!(!r.contains("bad-1"));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_forget_specific_session() {
        let mut r = set();
        assert_eq!(forget(&mut r, false, &["ok-2".to_string()]), 1);
        assert!(r.contains("bad-1"));
        assert!(!r.contains("ok-2"));
    }
}
