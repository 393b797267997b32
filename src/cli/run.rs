// src/cli/run.rs — `chatqa run`: the batch evaluation pipeline

use std::path::PathBuf;
use std::sync::Arc;

use super::progress::terminal_progress;
use super::RunArgs;
use crate::core::checkpoint::CheckpointStore;
use crate::core::escalation::EscalationPolicy;
use crate::core::orchestrator::{BatchOrchestrator, RunFilter, Tiers};
use crate::core::types::RunSummary;
use crate::data::load_sessions;
use crate::evaluator::Evaluator;
use crate::infra::config::Config;
use crate::infra::paths::safe_model_name;
use crate::provider::ollama::OllamaProvider;

/// Config merged with command-line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub input: PathBuf,
    pub output_json: PathBuf,
    pub output_csv: PathBuf,
    pub tiers: Tiers,
    pub batch_size: usize,
    pub filter_only: Vec<String>,
    pub limit: Option<usize>,
}

impl RunSettings {
    pub fn resolve(config: &Config, args: &RunArgs) -> anyhow::Result<Self> {
        let primary = args
            .primary
            .clone()
            .unwrap_or_else(|| config.models.primary.clone());

        let secondary = if args.single_tier || !config.escalation.enabled {
            None
        } else {
            args.secondary
                .clone()
                .or_else(|| config.models.secondary.clone())
        };

        let batch_size = args.batch_size.unwrap_or(config.batch.size);
        if batch_size == 0 {
            anyhow::bail!("--batch-size must be at least 1");
        }

        // Single-tier runs without an explicit output get per-model files so
        // runs against different models never share a checkpoint.
        let (default_json, default_csv) = if secondary.is_none() && args.single_tier {
            let safe = safe_model_name(&primary);
            (
                PathBuf::from(format!("quality_reports_{}.json", safe)),
                PathBuf::from(format!("quality_reports_{}.csv", safe)),
            )
        } else {
            (config.batch.output_json.clone(), config.batch.output_csv.clone())
        };

        Ok(Self {
            input: args
                .input
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| config.batch.input.clone()),
            output_json: args.output.as_ref().map(PathBuf::from).unwrap_or(default_json),
            output_csv: args.csv.as_ref().map(PathBuf::from).unwrap_or(default_csv),
            tiers: Tiers { primary, secondary },
            batch_size,
            filter_only: args.only.clone(),
            limit: args.limit,
        })
    }
}

pub async fn run_batch(config: &Config, args: RunArgs) -> anyhow::Result<RunSummary> {
    let settings = RunSettings::resolve(config, &args)?;
    let sessions = load_sessions(&settings.input)?;

    let provider = Arc::new(OllamaProvider::from_config(&config.inference));
    let evaluator = Evaluator::new(provider).with_temperature(config.inference.temperature);

    let orchestrator = BatchOrchestrator::new(
        evaluator,
        settings.tiers.clone(),
        CheckpointStore::new(&settings.output_json),
    )
    .with_policy(EscalationPolicy::from_config(&config.escalation))
    .with_batch_size(settings.batch_size)
    .with_csv(&settings.output_csv)
    .with_progress(terminal_progress(args.quiet));

    let filter = RunFilter {
        only: settings.filter_only.clone(),
        limit: settings.limit,
    };
    let summary = orchestrator.run(&sessions, &filter).await?;

    if summary.attempted == 0 {
        eprintln!("Nothing to do: every session already has a report.");
    } else {
        eprintln!(
            "Reports saved to {} and {}",
            settings.output_json.display(),
            settings.output_csv.display()
        );
    }
    Ok(summary)
}
