// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub escalation: EscalationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Tier 1: the cheap evaluator every session goes through.
    pub primary: String,
    /// Tier 2: only consulted on escalation. `None` runs single-tier.
    pub secondary: Option<String>,
    /// Embedding model used by reply retrieval.
    pub embedder: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            primary: "qwen3:8b".into(),
            secondary: Some("llama3".into()),
            embedder: "nomic-embed-text".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".into(),
            timeout_seconds: 180,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub size: usize,
    pub input: PathBuf,
    pub output_json: PathBuf,
    pub output_csv: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: 500,
            input: "clean_chat_history.json".into(),
            output_json: "quality_reports_hybrid.json".into(),
            output_csv: "quality_reports_hybrid.csv".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    pub enabled: bool,
    pub score_threshold: u8,
    pub on_unresolved: bool,
    pub on_low_satisfaction: bool,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            score_threshold: 70,
            on_unresolved: true,
            on_low_satisfaction: true,
        }
    }
}

impl Config {
    /// Load config from the discovered file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match paths::config_file_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// `OLLAMA_HOST` overrides the configured base URL.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            let host = host.trim();
            if !host.is_empty() {
                self.inference.base_url = normalize_host(host);
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch.size == 0 {
            anyhow::bail!("batch.size must be at least 1");
        }
        if self.models.primary.trim().is_empty() {
            anyhow::bail!("models.primary must not be empty");
        }
        if self.escalation.score_threshold > 100 {
            anyhow::bail!(
                "escalation.score_threshold must be within 0-100, got {}",
                self.escalation.score_threshold
            );
        }
        Ok(())
    }
}

/// `OLLAMA_HOST` is commonly set without a scheme (`0.0.0.0:11434`).
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.models.primary, "qwen3:8b");
        assert_eq!(c.models.secondary.as_deref(), Some("llama3"));
        assert_eq!(c.batch.size, 500);
        assert_eq!(c.inference.timeout_seconds, 180);
        assert_eq!(c.escalation.score_threshold, 70);
        assert!(c.escalation.enabled);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.batch.size, 500);
        assert_eq!(config.inference.base_url, "http://127.0.0.1:11434");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[models]
primary = "mistral"
secondary = "llama3:70b"
embedder = "all-minilm"

[inference]
base_url = "http://gpu-box:11434"
timeout_seconds = 60
temperature = 0.1

[batch]
size = 2
input = "data/sessions.json"
output_json = "out/reports.json"
output_csv = "out/reports.csv"

[escalation]
enabled = false
score_threshold = 80
on_unresolved = false
on_low_satisfaction = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.primary, "mistral");
        assert_eq!(config.models.secondary.as_deref(), Some("llama3:70b"));
        assert_eq!(config.inference.timeout_seconds, 60);
        assert_eq!(config.inference.temperature, Some(0.1));
        assert_eq!(config.batch.size, 2);
        assert_eq!(config.batch.input, PathBuf::from("data/sessions.json"));
        assert!(!config.escalation.enabled);
        assert_eq!(config.escalation.score_threshold, 80);
        assert!(!config.escalation.on_unresolved);
    }

    #[test]
    fn test_single_tier_toml() {
        let toml_str = r#"
[models]
primary = "qwen3:8b"
embedder = "nomic-embed-text"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.models.secondary.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let mut c = Config::default();
        c.batch.size = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_threshold_over_100() {
        let mut c = Config::default();
        c.escalation.score_threshold = 101;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("0.0.0.0:11434"), "http://0.0.0.0:11434");
        assert_eq!(
            normalize_host("https://ollama.internal/"),
            "https://ollama.internal"
        );
    }
}
