// src/evaluator/mod.rs — Evaluator adapter: one transcript in, one raw verdict out

pub mod parser;
pub mod prompt;

use std::sync::Arc;

use crate::core::types::{RawReport, Turn};
use crate::infra::errors::ChatQaError;
use crate::provider::{GenerateRequest, ModelProvider};

/// Sends a session transcript to the inference service and parses the verdict.
///
/// Performs exactly one call per `evaluate`; retry policy belongs to the caller.
pub struct Evaluator {
    provider: Arc<dyn ModelProvider>,
    temperature: Option<f32>,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub async fn evaluate(&self, model: &str, history: &[Turn]) -> Result<RawReport, ChatQaError> {
        let request = GenerateRequest {
            model: model.to_string(),
            prompt: prompt::build_prompt(history),
            temperature: self.temperature,
        };

        let response = self.provider.generate(request).await?;
        tracing::debug!(
            provider = self.provider.id(),
            model,
            tokens = response.usage.total(),
            "evaluation response received"
        );

        parser::extract_report(&response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{GenerateResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedProvider {
        reply: Result<String, u16>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    #[async_trait]
    impl ModelProvider for CannedProvider {
        fn id(&self) -> &str {
            "canned"
        }

        async fn generate(
            &self,
            request: GenerateRequest,
        ) -> Result<GenerateResponse, ChatQaError> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(GenerateResponse {
                    text: text.clone(),
                    usage: TokenUsage::default(),
                }),
                Err(status) => Err(ChatQaError::Service {
                    status: *status,
                    body: String::new(),
                }),
            }
        }

        async fn embed(&self, _model: &str, _texts: &[&str]) -> Result<Vec<Vec<f32>>, ChatQaError> {
            Ok(vec![])
        }
    }

    fn canned(reply: Result<&str, u16>) -> Arc<CannedProvider> {
        Arc::new(CannedProvider {
            reply: reply.map(String::from),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_evaluate_parses_wrapped_json() {
        let provider = canned(Ok("Here it is: {\"quality_score\": 91, \"summary\": \"fine\"} done"));
        let eval = Evaluator::new(provider.clone());
        let raw = eval
            .evaluate("qwen3:8b", &[Turn::user("hi"), Turn::bot("hello")])
            .await
            .unwrap();
        assert_eq!(raw.quality_score, Some(91.0));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "qwen3:8b");
        assert!(seen[0].prompt.contains("\"message\": \"hello\""));
    }

    #[tokio::test]
    async fn test_evaluate_propagates_service_error() {
        let eval = Evaluator::new(canned(Err(503)));
        let err = eval.evaluate("llama3", &[]).await.unwrap_err();
        assert!(matches!(err, ChatQaError::Service { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_evaluate_malformed_text() {
        let eval = Evaluator::new(canned(Ok("no verdict today")));
        let err = eval.evaluate("llama3", &[]).await.unwrap_err();
        assert!(matches!(err, ChatQaError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_temperature_forwarded() {
        let provider = canned(Ok("{}"));
        let eval = Evaluator::new(provider.clone()).with_temperature(Some(0.1));
        eval.evaluate("m", &[]).await.unwrap();
        assert_eq!(provider.seen.lock().unwrap()[0].temperature, Some(0.1));
    }
}
