// src/cli/status.rs — `chatqa status`: progress counts

use std::path::PathBuf;

use crate::core::checkpoint::{CheckpointStore, ReportSet};
use crate::core::types::Session;
use crate::data::load_sessions;
use crate::infra::config::Config;
use crate::provider::ollama::OllamaProvider;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub processed: usize,
    pub remaining: usize,
    pub errors: usize,
    /// Reports whose final verdict came from the secondary model.
    pub escalated: usize,
    pub by_model: Vec<(String, usize)>,
}

/// Counts for `sessions` against the checkpoint contents.
pub fn compute_status(
    sessions: &[Session],
    reports: &ReportSet,
    secondary: Option<&str>,
) -> StatusCounts {
    let mut seen = std::collections::HashSet::new();
    let remaining = sessions
        .iter()
        .filter(|s| !reports.contains(&s.session_id) && seen.insert(s.session_id.as_str()))
        .count();

    let mut by_model: Vec<(String, usize)> = Vec::new();
    for report in reports.iter() {
        match by_model.iter_mut().find(|(m, _)| *m == report.model_used) {
            Some((_, n)) => *n += 1,
            None => by_model.push((report.model_used.clone(), 1)),
        }
    }
    by_model.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    StatusCounts {
        total: sessions.len(),
        processed: reports.len(),
        remaining,
        errors: reports.error_count(),
        escalated: secondary.map_or(0, |m| {
            reports.iter().filter(|r| r.model_used == m).count()
        }),
        by_model,
    }
}

pub async fn show_status(
    config: &Config,
    input: Option<&str>,
    output: Option<&str>,
    probe: bool,
) -> anyhow::Result<()> {
    let input = input.map(PathBuf::from).unwrap_or_else(|| config.batch.input.clone());
    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| config.batch.output_json.clone());

    let sessions = load_sessions(&input)?;
    let reports = CheckpointStore::new(&output).load();
    let counts = compute_status(&sessions, &reports, config.models.secondary.as_deref());

    println!("Input:       {}", input.display());
    println!("Checkpoint:  {}", output.display());
    println!("Total sessions:    {}", counts.total);
    println!("Already processed: {}", counts.processed);
    println!("Remaining:         {}", counts.remaining);
    println!("Errors:            {}", counts.errors);
    println!("Escalated:         {}", counts.escalated);
    println!("By model:");
    for (model, n) in &counts.by_model {
        println!("  {:<20} {}", model, n);
    }

    if probe {
        let provider = OllamaProvider::from_config(&config.inference);
        match provider.probe().await {
            Ok(models) => {
                println!("Inference service: {} ({} models)", provider.base_url(), models.len());
                for m in models {
                    let mut tags = Vec::new();
                    if m == config.models.primary {
                        tags.push("primary");
                    }
                    if config.models.secondary.as_deref() == Some(m.as_str()) {
                        tags.push("secondary");
                    }
                    if tags.is_empty() {
                        println!("  {}", m);
                    } else {
                        println!("  {} ({})", m, tags.join(", "));
                    }
                }
            }
            Err(e) => println!("Inference service: unreachable ({})", e),
        }
    }

    Ok(())
}
