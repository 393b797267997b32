// src/lookup/retrieval.rs — Nearest stored bot reply for a user query
//
// Indexes every (user -> bot) adjacent turn pair from past sessions, embeds
// the user side, and answers a new query with the bot reply whose user query
// is closest by cosine similarity.

use std::sync::Arc;

use super::embeddings::best_match;
use crate::core::types::{Session, Speaker};
use crate::infra::errors::ChatQaError;
use crate::provider::ModelProvider;

/// Returned when the index holds no usable pairs.
pub const FALLBACK_REPLY: &str =
    "Thank you for your query. Please provide more details so I can help you.";

pub struct ReplyIndex {
    provider: Arc<dyn ModelProvider>,
    model: String,
    user_queries: Vec<String>,
    bot_replies: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

/// User/bot pairs worth answering from: the bot reply is non-empty and not
/// itself an error message.
pub fn reply_pairs(sessions: &[Session]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for session in sessions {
        for window in session.history.windows(2) {
            let (q, a) = (&window[0], &window[1]);
            if q.speaker != Speaker::User || a.speaker != Speaker::Bot {
                continue;
            }
            let reply = a.message.trim().to_lowercase();
            if reply.is_empty() || reply.contains("error") {
                continue;
            }
            pairs.push((q.message.clone(), a.message.clone()));
        }
    }
    pairs
}

impl ReplyIndex {
    pub async fn build(
        provider: Arc<dyn ModelProvider>,
        model: impl Into<String>,
        sessions: &[Session],
    ) -> Result<Self, ChatQaError> {
        let model = model.into();
        let (user_queries, bot_replies): (Vec<String>, Vec<String>) =
            reply_pairs(sessions).into_iter().unzip();

        let embeddings = if user_queries.is_empty() {
            Vec::new()
        } else {
            let texts: Vec<&str> = user_queries.iter().map(String::as_str).collect();
            provider.embed(&model, &texts).await?
        };
        tracing::debug!(
            provider = provider.id(),
            pairs = user_queries.len(),
            "reply index built"
        );

        Ok(Self {
            provider,
            model,
            user_queries,
            bot_replies,
            embeddings,
        })
    }

    pub fn len(&self) -> usize {
        self.user_queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_queries.is_empty()
    }

    pub async fn retrieve_best_reply(&self, query: &str) -> Result<String, ChatQaError> {
        if self.embeddings.is_empty() {
            return Ok(FALLBACK_REPLY.to_string());
        }

        let query_embedding = self
            .provider
            .embed(&self.model, &[query])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ChatQaError::MalformedResponse("empty embedding result".into()))?;

        Ok(best_match(&self.embeddings, &query_embedding)
            .and_then(|(i, _)| self.bot_replies.get(i).cloned())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}
