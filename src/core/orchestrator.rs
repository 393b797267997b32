// src/core/orchestrator.rs — Resumable two-tier batch controller

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::Instrument;

use super::checkpoint::{CheckpointStore, ReportSet};
use super::escalation::EscalationPolicy;
use super::projector;
use super::types::*;
use crate::evaluator::Evaluator;
use crate::infra::errors::ChatQaError;

/// Which models evaluate a session. `secondary: None` disables escalation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tiers {
    pub primary: String,
    pub secondary: Option<String>,
}

impl Tiers {
    pub fn single(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
        }
    }

    pub fn hybrid(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: Some(secondary.into()),
        }
    }
}

/// How a session's evaluation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Tier-1 verdict accepted as final.
    Accepted(QualityReport),
    /// Tier-2 verdict replaced tier 1.
    Escalated(QualityReport),
    /// Either tier failed; carries the synthetic error report.
    Failed(QualityReport),
}

impl Outcome {
    pub fn report(&self) -> &QualityReport {
        match self {
            Outcome::Accepted(r) | Outcome::Escalated(r) | Outcome::Failed(r) => r,
        }
    }

    pub fn into_report(self) -> QualityReport {
        match self {
            Outcome::Accepted(r) | Outcome::Escalated(r) | Outcome::Failed(r) => r,
        }
    }
}

/// Options narrowing which sessions a run touches.
#[derive(Debug, Clone, Default)]
pub struct RunFilter {
    /// Restrict to these ids. Empty means every session.
    pub only: Vec<String>,
    /// Stop after attempting this many sessions.
    pub limit: Option<usize>,
}

/// Drives a run: resume from the checkpoint, evaluate what's left in
/// fixed-size batches, persist after each one.
pub struct BatchOrchestrator {
    evaluator: Evaluator,
    tiers: Tiers,
    policy: EscalationPolicy,
    store: CheckpointStore,
    csv_path: Option<PathBuf>,
    batch_size: usize,
    on_progress: Option<Box<dyn Fn(BatchEvent) + Send>>,
}

impl BatchOrchestrator {
    pub fn new(evaluator: Evaluator, tiers: Tiers, store: CheckpointStore) -> Self {
        Self {
            evaluator,
            tiers,
            policy: EscalationPolicy::default(),
            store,
            csv_path: None,
            batch_size: 500,
            on_progress: None,
        }
    }

    pub fn with_policy(mut self, policy: EscalationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Regenerate the CSV projection at this path after every batch.
    pub fn with_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    /// Set a callback for real-time progress events.
    pub fn with_progress(mut self, cb: impl Fn(BatchEvent) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(cb));
        self
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    /// Sessions not yet in `reports`, in input order, first occurrence only.
    pub fn remaining<'a>(
        sessions: &'a [Session],
        reports: &ReportSet,
        filter: &RunFilter,
    ) -> Vec<&'a Session> {
        let only: HashSet<&str> = filter.only.iter().map(String::as_str).collect();
        let limit = filter.limit.unwrap_or(usize::MAX);
        let processed = reports.processed_ids();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut remaining = Vec::new();
        for session in sessions {
            if remaining.len() >= limit {
                break;
            }
            let id = session.session_id.as_str();
            if !only.is_empty() && !only.contains(id) {
                continue;
            }
            if processed.contains(id) || !seen.insert(id) {
                continue;
            }
            remaining.push(session);
        }
        remaining
    }

    /// Run the pipeline over `sessions`, resuming from the checkpoint.
    pub async fn run(&self, sessions: &[Session], filter: &RunFilter) -> anyhow::Result<RunSummary> {
        let run_id = uuid::Uuid::new_v4().to_string();
        self.run_inner(sessions, filter)
            .instrument(tracing::info_span!("batch_run", run_id = %run_id))
            .await
    }

    async fn run_inner(
        &self,
        sessions: &[Session],
        filter: &RunFilter,
    ) -> anyhow::Result<RunSummary> {
        let mut reports = self.store.load();
        let remaining = Self::remaining(sessions, &reports, filter);
        let total = sessions.len();
        let batches = remaining.len().div_ceil(self.batch_size);

        let mut summary = RunSummary {
            total,
            already_processed: reports.len(),
            ..Default::default()
        };

        tracing::info!(
            total,
            already_processed = reports.len(),
            remaining = remaining.len(),
            primary = %self.tiers.primary,
            secondary = ?self.tiers.secondary,
            "starting batch run"
        );
        self.emit(BatchEvent::Plan {
            total,
            already_processed: reports.len(),
            remaining: remaining.len(),
        });

        for (i, batch) in remaining.chunks(self.batch_size).enumerate() {
            self.emit(BatchEvent::BatchStart {
                batch: i + 1,
                batches,
                size: batch.len(),
            });

            reports = self.process_batch(reports, batch, total, &mut summary).await;
            self.persist(&reports)?;
            summary.batches += 1;

            self.emit(BatchEvent::BatchSaved {
                batch: i + 1,
                processed: reports.len(),
                total,
            });
        }

        tracing::info!(
            attempted = summary.attempted,
            escalated = summary.escalated,
            failed = summary.failed,
            "batch run complete"
        );
        self.emit(BatchEvent::Complete(summary.clone()));
        Ok(summary)
    }

    /// Evaluate one batch, folding every outcome into `reports`.
    ///
    /// Never fails: per-session errors become error reports.
    pub async fn process_batch(
        &self,
        mut reports: ReportSet,
        batch: &[&Session],
        total: usize,
        summary: &mut RunSummary,
    ) -> ReportSet {
        for session in batch {
            self.emit(BatchEvent::SessionStart {
                position: reports.len() + 1,
                total,
                session_id: session.session_id.clone(),
            });

            let outcome = self.evaluate_session(session).await;
            summary.attempted += 1;
            match &outcome {
                Outcome::Accepted(_) => {}
                Outcome::Escalated(_) => summary.escalated += 1,
                Outcome::Failed(r) => {
                    summary.failed += 1;
                    self.emit(BatchEvent::SessionFailed {
                        session_id: r.session_id.clone(),
                        message: r.message.clone().unwrap_or_default(),
                    });
                }
            }

            let report = outcome.into_report();
            self.emit(BatchEvent::SessionDone {
                session_id: report.session_id.clone(),
                model_used: report.model_used.clone(),
                quality_score: report.quality_score,
            });
            reports.insert(report);
        }
        reports
    }

    /// Run one session through tier 1 and, if warranted, tier 2.
    pub async fn evaluate_session(&self, session: &Session) -> Outcome {
        match self.assess(session).await {
            Ok((raw, model, escalated)) => {
                let report = QualityReport::from_raw(&session.session_id, raw, model, timestamp());
                if escalated {
                    Outcome::Escalated(report)
                } else {
                    Outcome::Accepted(report)
                }
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session.session_id,
                    kind = e.kind(),
                    "evaluation failed: {}",
                    e
                );
                Outcome::Failed(QualityReport::failure(&session.session_id, &e, timestamp()))
            }
        }
    }

    /// A tier-2 failure discards the tier-1 verdict.
    async fn assess(&self, session: &Session) -> Result<(RawReport, String, bool), ChatQaError> {
        let primary = &self.tiers.primary;
        let report = self.evaluator.evaluate(primary, &session.history).await?;

        let Some(secondary) = &self.tiers.secondary else {
            return Ok((report, primary.clone(), false));
        };
        let Some(reason) = self.policy.reason(&report) else {
            return Ok((report, primary.clone(), false));
        };

        tracing::info!(
            session_id = %session.session_id,
            %reason,
            "rechecking with {}",
            secondary
        );
        self.emit(BatchEvent::Escalated {
            session_id: session.session_id.clone(),
            from: primary.clone(),
            to: secondary.clone(),
        });

        let report = self.evaluator.evaluate(secondary, &session.history).await?;
        Ok((report, secondary.clone(), true))
    }

    fn persist(&self, reports: &ReportSet) -> anyhow::Result<()> {
        self.store.save(reports)?;
        if let Some(ref path) = self.csv_path {
            projector::write_csv(reports, path)?;
        }
        tracing::debug!(
            reports = reports.len(),
            path = %self.store.path().display(),
            "checkpoint saved"
        );
        Ok(())
    }
}
