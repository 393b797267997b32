// src/infra/errors.rs — Error types for chatqa
//
// Only evaluation failures are typed: they are caught per session and turned
// into error reports. Infrastructure failures (input, checkpoint writes,
// config) travel as `anyhow::Error` up to `main`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatQaError {
    #[error("Cannot reach inference service at {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Inference service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

impl ChatQaError {
    /// Short machine-readable label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatQaError::Transport { .. } => "transport",
            ChatQaError::Service { .. } => "service",
            ChatQaError::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let t = ChatQaError::Transport {
            endpoint: "http://localhost:11434".into(),
            message: "connection refused".into(),
        };
        assert_eq!(t.kind(), "transport");
        assert_eq!(
            ChatQaError::MalformedResponse("no JSON object".into()).kind(),
            "malformed_response"
        );
    }

    #[test]
    fn test_display_messages() {
        let s = ChatQaError::Service {
            status: 404,
            body: "model not found".into(),
        };
        assert_eq!(
            s.to_string(),
            "Inference service returned HTTP 404: model not found"
        );
        assert_eq!(s.kind(), "service");
    }
}
