// src/provider/mod.rs — Inference service layer

pub mod ollama;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::ChatQaError;

/// Core trait for the text-generation backend.
///
/// One call is one blocking round trip; implementations must not retry.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ChatQaError>;

    async fn embed(&self, model: &str, texts: &[&str]) -> Result<Vec<Vec<f32>>, ChatQaError>;
}

#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: Option<f32>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// The `response` text field of the service envelope.
    pub text: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}
