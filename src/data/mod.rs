// src/data/mod.rs — Input datasets

pub mod clean;

use std::path::Path;

use anyhow::Context;

use crate::core::types::Session;

/// Read the session input file (a JSON array of sessions).
pub fn load_sessions(path: &Path) -> anyhow::Result<Vec<Session>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read sessions from {}", path.display()))?;
    let sessions: Vec<Session> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of sessions", path.display()))?;
    Ok(sessions)
}
