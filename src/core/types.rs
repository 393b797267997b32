// src/core/types.rs — Core domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::infra::errors::ChatQaError;

/// `model_used` value on reports produced from a failed evaluation.
pub const ERROR_MODEL: &str = "error";

/// One recorded conversation. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    #[serde(default)]
    pub history: Vec<Turn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    #[serde(default)]
    pub message: String,
}

impl Turn {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            message: message.into(),
        }
    }

    pub fn bot(message: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            message: message.into(),
        }
    }
}

/// Speaker role. Unknown roles are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    High,
    Medium,
    Low,
}

impl Rating {
    /// Case-insensitive parse; anything unrecognised is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Rating::High),
            "medium" => Some(Rating::Medium),
            "low" => Some(Rating::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::High => "high",
            Rating::Medium => "medium",
            Rating::Low => "low",
        }
    }
}

/// The evaluator's JSON object as parsed, before any normalisation.
///
/// Built from any JSON object: fields with an unexpected type are coerced
/// where the intent is clear (`"85"`, `"true"`, a single issue string) and
/// otherwise left `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawReport {
    pub user_satisfaction: Option<String>,
    pub bot_accuracy: Option<String>,
    pub issue_resolved: Option<bool>,
    pub chat_complete: Option<bool>,
    pub issues: Option<Vec<String>>,
    pub quality_score: Option<f64>,
    pub summary: Option<String>,
}

impl From<Map<String, Value>> for RawReport {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            user_satisfaction: map.get("user_satisfaction").and_then(text),
            bot_accuracy: map.get("bot_accuracy").and_then(text),
            issue_resolved: map.get("issue_resolved").and_then(flag),
            chat_complete: map.get("chat_complete").and_then(flag),
            issues: map.get("issues").and_then(issue_list),
            quality_score: map.get("quality_score").and_then(number),
            summary: map.get("summary").and_then(text),
        }
    }
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn issue_list(v: &Value) -> Option<Vec<String>> {
    match v {
        Value::Array(items) => Some(items.iter().filter_map(text).collect()),
        Value::String(s) if s.trim().is_empty() => Some(Vec::new()),
        Value::String(s) => Some(vec![s.trim().to_string()]),
        _ => None,
    }
}

fn strict_issue_list(v: &Value) -> Option<Vec<String>> {
    v.as_array()?
        .iter()
        .map(|i| i.as_str().map(String::from))
        .collect()
}

/// One verdict per session, as persisted in the checkpoint.
///
/// Loading never rejects an entry that has a `session_id`. Keys this tool
/// does not know, and known keys whose stored value has an unexpected type,
/// are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct QualityReport {
    pub session_id: String,

    /// Normalised to `high`/`medium`/`low` when recognised, otherwise verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_satisfaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_accuracy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    pub model_used: String,
    pub generated_at: String,

    #[serde(skip_serializing_if = "is_false")]
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TryFrom<Map<String, Value>> for QualityReport {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let session_id = match map.remove("session_id") {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err("missing `session_id`".into()),
        };
        let as_string = |v: &Value| v.as_str().map(String::from);

        Ok(Self {
            session_id,
            user_satisfaction: take(&mut map, "user_satisfaction", as_string),
            bot_accuracy: take(&mut map, "bot_accuracy", as_string),
            issue_resolved: take(&mut map, "issue_resolved", Value::as_bool),
            chat_complete: take(&mut map, "chat_complete", Value::as_bool),
            issues: take(&mut map, "issues", strict_issue_list),
            quality_score: take(&mut map, "quality_score", stored_score),
            summary: take(&mut map, "summary", as_string),
            model_used: take_text(&mut map, "model_used"),
            generated_at: take_text(&mut map, "generated_at"),
            error: take(&mut map, "error", Value::as_bool).unwrap_or(false),
            message: take(&mut map, "message", as_string),
            extra: map,
        })
    }
}

/// Remove `key` only if its value converts; otherwise it stays in `map`.
fn take<T>(
    map: &mut Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let converted = map.get(key).and_then(convert)?;
    map.remove(key);
    Some(converted)
}

/// A persisted score is a whole number in 0..=100; anything else is kept raw.
fn stored_score(v: &Value) -> Option<u8> {
    v.as_f64()
        .filter(|f| f.fract() == 0.0 && (0.0..=100.0).contains(f))
        .map(|f| f as u8)
}

/// Always-written string fields: coerce whatever is stored.
fn take_text(map: &mut Map<String, Value>, key: &str) -> String {
    match map.remove(key) {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Lowercase a recognised rating; keep anything else as written.
fn normalize_rating(raw: Option<String>) -> Option<String> {
    raw.map(|r| match Rating::parse(&r) {
        Some(rating) => rating.as_str().to_string(),
        None => r.trim().to_string(),
    })
}

/// Round and clamp a model-reported score into 0..=100.
pub fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

impl QualityReport {
    /// Final verdict from a successfully parsed evaluation.
    pub fn from_raw(
        session_id: impl Into<String>,
        raw: RawReport,
        model_used: impl Into<String>,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_satisfaction: normalize_rating(raw.user_satisfaction),
            bot_accuracy: normalize_rating(raw.bot_accuracy),
            issue_resolved: raw.issue_resolved,
            chat_complete: raw.chat_complete,
            issues: Some(raw.issues.unwrap_or_default()),
            quality_score: raw.quality_score.map(clamp_score),
            summary: raw.summary,
            model_used: model_used.into(),
            generated_at: generated_at.into(),
            error: false,
            message: None,
            extra: Map::new(),
        }
    }

    /// Synthetic report standing in for a session whose evaluation failed.
    pub fn failure(
        session_id: impl Into<String>,
        err: &ChatQaError,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_satisfaction: None,
            bot_accuracy: None,
            issue_resolved: None,
            chat_complete: None,
            issues: None,
            quality_score: None,
            summary: None,
            model_used: ERROR_MODEL.into(),
            generated_at: generated_at.into(),
            error: true,
            message: Some(err.to_string()),
            extra: Map::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}

/// Current time in the checkpoint's timestamp format.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Counters for one orchestrator run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub already_processed: usize,
    pub attempted: usize,
    pub escalated: usize,
    pub failed: usize,
    pub batches: usize,
}

/// Progress events emitted during a batch run.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Plan {
        total: usize,
        already_processed: usize,
        remaining: usize,
    },
    BatchStart {
        batch: usize,
        batches: usize,
        size: usize,
    },
    SessionStart {
        position: usize,
        total: usize,
        session_id: String,
    },
    Escalated {
        session_id: String,
        from: String,
        to: String,
    },
    SessionFailed {
        session_id: String,
        message: String,
    },
    SessionDone {
        session_id: String,
        model_used: String,
        quality_score: Option<u8>,
    },
    BatchSaved {
        batch: usize,
        processed: usize,
        total: usize,
    },
    Complete(RunSummary),
}
