// src/evaluator/prompt.rs — Fixed-schema evaluation prompt

use crate::core::types::Turn;

const INSTRUCTIONS: &str = "\
You are an AI quality analyst.

Analyze the chatbot conversation below and RETURN ONLY VALID JSON.

IMPORTANT RULES:
- \"summary\" MUST NOT be empty
- \"summary\" must clearly explain:
  1. What the user problem was
  2. What the assistant did
  3. Whether the problem was resolved

Return JSON strictly in this format:

{
  \"user_satisfaction\": \"high|medium|low\",
  \"bot_accuracy\": \"high|medium|low\",
  \"issue_resolved\": true|false,
  \"chat_complete\": true|false,
  \"issues\": [],
  \"quality_score\": 0-100,
  \"summary\": \"A clear 2-3 sentence explanation of what happened in the chat\"
}";

/// Build the evaluation prompt. Turns are embedded as pretty-printed JSON in
/// their original order.
pub fn build_prompt(history: &[Turn]) -> String {
    // Serializing plain strings and enums cannot fail
    let conversation = serde_json::to_string_pretty(history).unwrap_or_else(|_| "[]".into());
    format!("{}\n\nConversation:\n{}\n", INSTRUCTIONS, conversation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_all_seven_fields() {
        let p = build_prompt(&[]);
        for field in [
            "user_satisfaction",
            "bot_accuracy",
            "issue_resolved",
            "chat_complete",
            "issues",
            "quality_score",
            "summary",
        ] {
            assert!(p.contains(field), "missing {field}");
        }
        assert!(!p.contains("session_id"));
        assert!(p.contains("RETURN ONLY VALID JSON"));
    }

    #[test]
    fn test_prompt_preserves_turn_order() {
        let history = vec![
            Turn::user("first question"),
            Turn::bot("first answer"),
            Turn::user("second question"),
        ];
        let p = build_prompt(&history);
        let a = p.find("first question").unwrap();
        let b = p.find("first answer").unwrap();
        let c = p.find("second question").unwrap();
        assert!(a < b && b < c);
        assert!(p.contains("\"speaker\": \"bot\""));
    }
}
