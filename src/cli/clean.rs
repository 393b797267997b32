// src/cli/clean.rs — `chatqa clean`: JSONL export to a clean JSON array

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;

use crate::core::checkpoint::write_atomic;
use crate::data::clean::{clean_records, CleanStats};

pub fn run_clean(input: &str, output: &str) -> anyhow::Result<CleanStats> {
    let file = File::open(input).with_context(|| format!("Cannot open {}", input))?;
    let (records, stats) = clean_records(BufReader::new(file))?;

    let json = serde_json::to_string_pretty(&records)?;
    write_atomic(Path::new(output), json.as_bytes())?;

    eprintln!(
        "Kept {} record(s), skipped {}. Written to {}",
        stats.kept, stats.skipped, output
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::CleanRecord;

    #[test]
    fn test_run_clean_writes_array() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.jsonl");
        let output = dir.path().join("clean.json");
        std::fs::write(
            &input,
            "{\"user_message\":\" hi \",\"bot_message\":\"hello\",\"ts\":1}\n\
             {\"user_message\":\"\",\"bot_message\":\"orphan\"}\n\
             not json\n",
        )
        .unwrap();

        let stats = run_clean(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();
        assert_eq!(stats, CleanStats { kept: 1, skipped: 2 });

        let written: Vec<CleanRecord> =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written[0].user_message, "hi");
    }

    #[test]
    fn test_run_clean_missing_input() {
        assert!(run_clean("/nonexistent/raw.jsonl", "/tmp/never.json").is_err());
    }
}
