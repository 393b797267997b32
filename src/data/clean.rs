// src/data/clean.rs — Record cleaning filter for raw chat-turn exports
//
// Input is line-delimited JSON, one `{user_message, bot_message, ...}` per
// line. Output keeps only the two message fields, trimmed, and drops any
// record without a user message.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub user_message: String,
    pub bot_message: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    user_message: Option<String>,
    #[serde(default)]
    bot_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub kept: usize,
    pub skipped: usize,
}

/// Clean one line. `Ok(None)` means the record was dropped by the rules.
pub fn clean_line(line: &str) -> Result<Option<CleanRecord>, serde_json::Error> {
    let raw: RawRecord = serde_json::from_str(line)?;
    let user_message = raw.user_message.unwrap_or_default().trim().to_string();
    if user_message.is_empty() {
        return Ok(None);
    }
    Ok(Some(CleanRecord {
        user_message,
        bot_message: raw.bot_message.unwrap_or_default().trim().to_string(),
    }))
}

/// Filter a JSONL stream. Unparseable lines count as skipped.
pub fn clean_records<R: BufRead>(reader: R) -> std::io::Result<(Vec<CleanRecord>, CleanStats)> {
    let mut records = Vec::new();
    let mut stats = CleanStats::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        match clean_line(&line) {
            Ok(Some(record)) => {
                records.push(record);
                stats.kept += 1;
            }
            Ok(None) => stats.skipped += 1,
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!("Skipped line {}: {}", line_no, e);
            }
        }
    }

    Ok((records, stats))
}
