// src/core/escalation.rs — Tier escalation predicate
//
// A first-tier verdict that signals low confidence (low score, unresolved
// issue, unhappy user) is re-evaluated by the secondary tier. Only ever
// consulted on a report that parsed; adapter failures never escalate.

use super::types::RawReport;
use crate::infra::config::EscalationConfig;

/// Score assumed when the evaluator omits `quality_score`.
const MISSING_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationPolicy {
    pub score_threshold: f64,
    pub on_unresolved: bool,
    pub on_low_satisfaction: bool,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            score_threshold: 70.0,
            on_unresolved: true,
            on_low_satisfaction: true,
        }
    }
}

impl EscalationPolicy {
    pub fn from_config(config: &EscalationConfig) -> Self {
        Self {
            score_threshold: config.score_threshold as f64,
            on_unresolved: config.on_unresolved,
            on_low_satisfaction: config.on_low_satisfaction,
        }
    }

    pub fn should_escalate(&self, report: &RawReport) -> bool {
        self.reason(report).is_some()
    }

    /// Which trigger fired, for logging. `None` means the verdict stands.
    pub fn reason(&self, report: &RawReport) -> Option<EscalationReason> {
        let score = report.quality_score.unwrap_or(MISSING_SCORE);
        if score < self.score_threshold {
            return Some(EscalationReason::LowScore);
        }
        if self.on_unresolved && report.issue_resolved == Some(false) {
            return Some(EscalationReason::Unresolved);
        }
        if self.on_low_satisfaction
            && report
                .user_satisfaction
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case("low"))
        {
            return Some(EscalationReason::LowSatisfaction);
        }
        None
    }
}

/// Default-policy shorthand.
pub fn should_escalate(report: &RawReport) -> bool {
    EscalationPolicy::default().should_escalate(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationReason {
    LowScore,
    Unresolved,
    LowSatisfaction,
}

impl std::fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowScore => write!(f, "low score"),
            Self::Unresolved => write!(f, "issue unresolved"),
            Self::LowSatisfaction => write!(f, "low satisfaction"),
        }
    }
}
