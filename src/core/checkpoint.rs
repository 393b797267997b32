// src/core/checkpoint.rs — Persisted report collection
//
// The checkpoint is a JSON array of QualityReport objects, rewritten in full
// after every batch via temp file + rename. A missing, empty or unreadable
// file loads as an empty collection; unreadable prior progress is discarded
// with a warning rather than failing the run.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::types::QualityReport;

/// Reports keyed by `session_id`, kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSet {
    reports: Vec<QualityReport>,
    index: HashMap<String, usize>,
}

impl ReportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the report previously stored for the id.
    pub fn insert(&mut self, report: QualityReport) -> Option<QualityReport> {
        match self.index.get(&report.session_id) {
            Some(&pos) => Some(std::mem::replace(&mut self.reports[pos], report)),
            None => {
                self.index
                    .insert(report.session_id.clone(), self.reports.len());
                self.reports.push(report);
                None
            }
        }
    }

    pub fn get(&self, session_id: &str) -> Option<&QualityReport> {
        self.index.get(session_id).map(|&pos| &self.reports[pos])
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.index.contains_key(session_id)
    }

    /// Every session id with a terminal report, success or error.
    pub fn processed_ids(&self) -> HashSet<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualityReport> {
        self.reports.iter()
    }

    pub fn error_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_error()).count()
    }

    /// Keep only the reports matching `keep`. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&QualityReport) -> bool) -> usize {
        let before = self.reports.len();
        self.reports.retain(|r| keep(r));
        self.reindex();
        before - self.reports.len()
    }

    fn reindex(&mut self) {
        self.index = self
            .reports
            .iter()
            .enumerate()
            .map(|(i, r)| (r.session_id.clone(), i))
            .collect();
    }

    pub fn as_slice(&self) -> &[QualityReport] {
        &self.reports
    }
}

impl FromIterator<QualityReport> for ReportSet {
    fn from_iter<I: IntoIterator<Item = QualityReport>>(iter: I) -> Self {
        let mut set = ReportSet::new();
        for report in iter {
            set.insert(report);
        }
        set
    }
}

/// Sole writer of the on-disk checkpoint file.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load prior progress. Never fails: unreadable state starts fresh.
    pub fn load(&self) -> ReportSet {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ReportSet::new(),
            Err(e) => {
                tracing::warn!(
                    "Checkpoint {} unreadable ({}). Starting fresh.",
                    self.path.display(),
                    e
                );
                return ReportSet::new();
            }
        };

        let content = content.trim();
        if content.is_empty() {
            return ReportSet::new();
        }

        let entries: Vec<serde_json::Value> = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    "Existing checkpoint {} corrupted ({}). Starting fresh.",
                    self.path.display(),
                    e
                );
                return ReportSet::new();
            }
        };

        let mut set = ReportSet::new();
        for (i, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<QualityReport>(entry) {
                Ok(report) => {
                    set.insert(report);
                }
                Err(e) => tracing::warn!("Skipping checkpoint entry #{}: {}", i, e),
            }
        }
        tracing::debug!("Loaded {} reports from {}", set.len(), self.path.display());
        set
    }

    /// Rewrite the whole checkpoint (temp file + rename).
    pub fn save(&self, reports: &ReportSet) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(reports.as_slice())?;
        write_atomic(&self.path, json.as_bytes())
    }
}

/// Write `bytes` to `path` so readers only ever see the old or the new file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "checkpoint".into());
    let tmp = dir.join(format!(".{}.tmp", file_name));

    let mut f = std::fs::File::create(&tmp)?;
    f.write_all(bytes)?;
    f.flush()?;
    f.sync_all()?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{QualityReport, RawReport};
    use crate::infra::errors::ChatQaError;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn ok_report(id: &str, score: f64) -> QualityReport {
        let raw = RawReport {
            quality_score: Some(score),
            summary: Some("fine".into()),
            ..Default::default()
        };
        QualityReport::from_raw(id, raw, "qwen3:8b", "2026-01-01T00:00:00.000Z")
    }

    #[test]
    fn test_insert_overwrites_never_duplicates() {
        let mut set = ReportSet::new();
        assert!(set.insert(ok_report("a", 50.0)).is_none());
        set.insert(ok_report("b", 60.0));
        let prev = set.insert(ok_report("a", 90.0)).unwrap();
        assert_eq!(prev.quality_score, Some(50));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a").unwrap().quality_score, Some(90));
        // Overwrite keeps the original position
        assert_eq!(set.as_slice()[0].session_id, "a");
    }

    #[test]
    fn test_processed_ids_include_errors() {
        let mut set = ReportSet::new();
        set.insert(ok_report("a", 80.0));
        let err = ChatQaError::MalformedResponse("x".into());
        set.insert(QualityReport::failure("b", &err, "t"));
        let ids = set.processed_ids();
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
        assert_eq!(set.error_count(), 1);
    }

    #[test]
    fn test_retain_reindexes() {
        let mut set: ReportSet = ["a", "b", "c"].iter().map(|id| ok_report(id, 80.0)).collect();
        let dropped = set.retain(|r| r.session_id != "b");
        assert_eq!(dropped, 1);
        assert!(!set.contains("b"));
        assert_eq!(set.get("c").unwrap().session_id, "c");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("nope.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(CheckpointStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_load_corrupted_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports.json");
        std::fs::write(&path, "[{\"session_id\": \"a\", ").unwrap();
        assert!(CheckpointStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_load_skips_entries_without_session_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports.json");
        std::fs::write(
            &path,
            r#"[{"session_id": "a", "model_used": "llama3"}, {"error": true}, {"session_id": "b"}]"#,
        )
        .unwrap();
        let set = CheckpointStore::new(&path).load();
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn test_load_duplicate_ids_keeps_latest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports.json");
        std::fs::write(
            &path,
            r#"[{"session_id": "a", "quality_score": 10}, {"session_id": "a", "quality_score": 99}]"#,
        )
        .unwrap();
        let set = CheckpointStore::new(&path).load();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").unwrap().quality_score, Some(99));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("out").join("reports.json"));
        let mut set = ReportSet::new();
        set.insert(ok_report("a", 80.0));
        set.insert(QualityReport::failure(
            "b",
            &ChatQaError::Service {
                status: 500,
                body: "oops".into(),
            },
            "t",
        ));
        store.save(&set).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, set);
        // No temp file left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_save_rewrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("reports.json"));
        let mut set = ReportSet::new();
        set.insert(ok_report("a", 80.0));
        store.save(&set).unwrap();
        set.insert(ok_report("a", 40.0));
        store.save(&set).unwrap();

        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0]["quality_score"], 40);
    }

    #[test]
    fn test_rewrite_preserves_fields_it_does_not_interpret() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports.json");
        std::fs::write(
            &path,
            r#"[{"session_id": "old", "bot_accuracy": "unknown", "quality_score": "N/A",
                 "model": {"name": "llama3"}, "model_used": "llama3", "generated_at": "t"}]"#,
        )
        .unwrap();
        let store = CheckpointStore::new(&path);
        let mut set = store.load();
        set.insert(ok_report("new", 90.0));
        store.save(&set).unwrap();

        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["bot_accuracy"], "unknown");
        assert_eq!(raw[0]["quality_score"], "N/A");
        assert_eq!(raw[0]["model"]["name"], "llama3");
        assert_eq!(store.load(), set);
    }
}
