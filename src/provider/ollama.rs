// src/provider/ollama.rs — Ollama local model provider

use async_trait::async_trait;
use std::time::Duration;

use super::{GenerateRequest, GenerateResponse, ModelProvider, TokenUsage};
use crate::infra::config::InferenceConfig;
use crate::infra::errors::ChatQaError;

pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or_else(|| "http://127.0.0.1:11434".into())
                .trim_end_matches('/')
                .to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(180),
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        Self::new(Some(config.base_url.clone()))
            .with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List locally available models (`GET /api/tags`).
    pub async fn probe(&self) -> Result<Vec<String>, ChatQaError> {
        let url = self.endpoint("/api/tags");
        let resp = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(3))
            .send()
            .await
            .map_err(|e| transport(&url, e))?;

        if !resp.status().is_success() {
            return Err(service_error(resp).await);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ChatQaError::MalformedResponse(format!("Invalid Ollama response: {}", e)))?;

        Ok(body["models"]
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .filter_map(|m| m["name"].as_str().map(|s| s.to_string()))
            .collect())
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

fn transport(url: &str, e: reqwest::Error) -> ChatQaError {
    let message = if e.is_timeout() {
        format!("request timed out: {}", e)
    } else {
        e.to_string()
    };
    ChatQaError::Transport {
        endpoint: url.to_string(),
        message,
    }
}

async fn service_error(response: reqwest::Response) -> ChatQaError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ChatQaError::Service {
        status,
        body: crate::util::truncate_str(body.trim(), 500).to_string(),
    }
}

/// Pull the `response` text out of a `/api/generate` envelope.
pub(crate) fn parse_generate_envelope(
    body: &serde_json::Value,
) -> Result<GenerateResponse, ChatQaError> {
    let text = body["response"].as_str().ok_or_else(|| {
        ChatQaError::MalformedResponse("Invalid Ollama response: missing `response` field".into())
    })?;

    Ok(GenerateResponse {
        text: text.to_string(),
        usage: TokenUsage {
            input_tokens: body["prompt_eval_count"].as_u64().unwrap_or(0) as u32,
            output_tokens: body["eval_count"].as_u64().unwrap_or(0) as u32,
        },
    })
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn id(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ChatQaError> {
        let mut body = serde_json::json!({
            "model": request.model,
            "prompt": request.prompt,
            "stream": false,
        });

        if let Some(temp) = request.temperature {
            body["options"] = serde_json::json!({ "temperature": temp });
        }

        let url = self.endpoint("/api/generate");
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        // Body read failures after a successful status are still transport problems
        let raw = response.text().await.map_err(|e| transport(&url, e))?;
        let envelope: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            ChatQaError::MalformedResponse(format!("Failed to parse response envelope: {}", e))
        })?;

        parse_generate_envelope(&envelope)
    }

    async fn embed(&self, model: &str, texts: &[&str]) -> Result<Vec<Vec<f32>>, ChatQaError> {
        let url = self.endpoint("/api/embeddings");
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            let body = serde_json::json!({
                "model": model,
                "prompt": text,
            });
            let response = self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(&body)
                .send()
                .await
                .map_err(|e| transport(&url, e))?;

            if !response.status().is_success() {
                return Err(service_error(response).await);
            }

            let resp: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ChatQaError::MalformedResponse(e.to_string()))?;
            let embedding: Vec<f32> = resp["embedding"]
                .as_array()
                .ok_or_else(|| {
                    ChatQaError::MalformedResponse("missing `embedding` array".into())
                })?
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                .collect();
            results.push(embedding);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_ok() {
        let body = serde_json::json!({
            "model": "qwen3:8b",
            "response": "{\"quality_score\": 80}",
            "done": true,
            "prompt_eval_count": 120,
            "eval_count": 40,
        });
        let resp = parse_generate_envelope(&body).unwrap();
        assert_eq!(resp.text, "{\"quality_score\": 80}");
        assert_eq!(resp.usage.total(), 160);
    }

    #[test]
    fn test_parse_envelope_missing_response() {
        let body = serde_json::json!({ "error": "model 'x' not found" });
        let err = parse_generate_envelope(&body).unwrap_err();
        assert!(matches!(err, ChatQaError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_envelope_non_string_response() {
        let body = serde_json::json!({ "response": 42 });
        assert!(parse_generate_envelope(&body).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let p = OllamaProvider::new(Some("http://localhost:11434/".into()));
        assert_eq!(p.base_url(), "http://localhost:11434");
        assert_eq!(p.endpoint("/api/generate"), "http://localhost:11434/api/generate");
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        // Port 9 (discard) on localhost is essentially never an HTTP server
        let p = OllamaProvider::new(Some("http://127.0.0.1:9".into()))
            .with_timeout(Duration::from_secs(2));
        let err = p
            .generate(GenerateRequest::new("qwen3:8b", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatQaError::Transport { .. }));
    }
}
