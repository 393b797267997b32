// src/cli/lookup.rs — `chatqa search` and `chatqa reply`

use std::path::PathBuf;
use std::sync::Arc;

use crate::data::load_sessions;
use crate::infra::config::Config;
use crate::lookup::catalog::{Catalog, SearchHit};
use crate::lookup::retrieval::ReplyIndex;
use crate::provider::ollama::OllamaProvider;

pub fn format_hit(hit: &SearchHit) -> String {
    format!("{:>4}  {:<10} {}  ({})", hit.score, hit.legacy_id, hit.name, hit.slug)
}

pub async fn run_search(query: &str, catalog: &str, limit: usize) -> anyhow::Result<()> {
    let catalog = Catalog::load(catalog).await?;
    tracing::debug!(products = catalog.len(), "catalog loaded");

    let hits = catalog.search(query, limit);
    if hits.is_empty() {
        eprintln!("No matches for '{}'", query);
        return Ok(());
    }
    for hit in &hits {
        println!("{}", format_hit(hit));
    }
    Ok(())
}

pub async fn run_reply(config: &Config, query: &str, input: Option<&str>) -> anyhow::Result<()> {
    let input = input.map(PathBuf::from).unwrap_or_else(|| config.batch.input.clone());
    let sessions = load_sessions(&input)?;

    let provider = Arc::new(OllamaProvider::from_config(&config.inference));
    let index = ReplyIndex::build(provider, config.models.embedder.clone(), &sessions).await?;
    tracing::info!(pairs = index.len(), "reply index ready");

    println!("{}", index.retrieve_best_reply(query).await?);
    Ok(())
}
