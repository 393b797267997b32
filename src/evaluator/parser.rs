// src/evaluator/parser.rs — Pull the JSON verdict out of free-form model text
//
// Models wrap the requested object in chatter ("Sure, here you go: {...}
// Thanks!"). Extraction is two explicit steps: locate the first `{` and the
// last `}`, then parse what lies between. Best effort: a brace pair inside
// the preamble can be picked up instead of the intended object.

use crate::core::types::RawReport;
use crate::infra::errors::ChatQaError;

/// Step one: the substring from the first `{` through the last `}`.
pub fn locate_json_object(text: &str) -> Result<&str, ChatQaError> {
    if text.trim().is_empty() {
        return Err(ChatQaError::MalformedResponse(
            "Empty response from model".into(),
        ));
    }

    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&text[s..=e]),
        _ => Err(ChatQaError::MalformedResponse(
            "Invalid JSON format from model: no {...} object found".into(),
        )),
    }
}

/// Step two: parse the located span. Any JSON object is accepted; field
/// types are interpreted leniently by `RawReport`.
pub fn extract_report(text: &str) -> Result<RawReport, ChatQaError> {
    let json_text = locate_json_object(text)?;
    let value: serde_json::Value = serde_json::from_str(json_text).map_err(|e| {
        ChatQaError::MalformedResponse(format!("Model JSON did not parse: {}", e))
    })?;
    match value {
        serde_json::Value::Object(map) => Ok(RawReport::from(map)),
        _ => Err(ChatQaError::MalformedResponse(
            "Model JSON is not an object".into(),
        )),
    }
}
