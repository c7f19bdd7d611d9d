//! JSON-file-backed history of completed timing sessions.
//!
//! The whole record list is rewritten on every mutation, so the file always
//! reflects the last known state. At human interaction rates that write
//! amplification is irrelevant. Records are newest-first; inserts prepend
//! and the list is capped at [`HISTORY_CAP`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::data_dir;
use crate::error::HistoryError;

/// Retention cap. Oldest entries beyond this are discarded on insert.
pub const HISTORY_CAP: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Stopwatch,
    Countdown,
}

impl TimerKind {
    /// Label used as the prefix of auto-generated record names.
    pub fn label(&self) -> &'static str {
        match self {
            TimerKind::Stopwatch => "Stopwatch",
            TimerKind::Countdown => "Countdown",
        }
    }
}

/// One completed (or externally terminated) timing session.
///
/// Immutable once stored, except `name`. For countdown sessions the duration
/// is the consumed part of the target and may be less than the wall-clock
/// span between the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    pub id: Uuid,
    pub kind: TimerKind,
    /// User-editable label; filled with an auto-generated name on insert
    /// when empty.
    #[serde(default)]
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Configured countdown length; zero for stopwatch records.
    #[serde(default)]
    pub original_ms: u64,
}

impl TimerRecord {
    pub fn new(
        kind: TimerKind,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        duration_ms: u64,
        original_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: String::new(),
            started_at,
            ended_at,
            duration_ms,
            original_ms,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// File-backed store of [`TimerRecord`]s, newest-first.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<TimerRecord>,
}

impl HistoryStore {
    /// `~/.config/timekeep/history.json`.
    pub fn default_path() -> std::io::Result<PathBuf> {
        Ok(data_dir()?.join("history.json"))
    }

    /// Load the store from `path`. A missing file yields an empty store;
    /// an unreadable or unparseable file is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| HistoryError::ParseFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(HistoryError::ReadFailed {
                    path,
                    source: e,
                })
            }
        };
        Ok(Self { path, records })
    }

    /// Like [`load`](Self::load), but a broken file falls back to an empty
    /// store; the cause is handed back so the caller can surface it as a
    /// warning. The abandoned file content is overwritten on the next save.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> (Self, Option<HistoryError>) {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(store) => (store, None),
            Err(e) => (
                Self {
                    path,
                    records: Vec::new(),
                },
                Some(e),
            ),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn records(&self) -> &[TimerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The newest `limit` records, for display.
    pub fn recent(&self, limit: usize) -> &[TimerRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    pub fn get(&self, id: Uuid) -> Option<&TimerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    // ── Mutations (each one saves synchronously) ─────────────────────

    /// Prepend a record, auto-naming it if unnamed, cap the list, save.
    /// Returns the record as stored. On a failed save the in-memory list
    /// keeps the record and stays authoritative until the next save.
    pub fn append(&mut self, mut record: TimerRecord) -> Result<TimerRecord, HistoryError> {
        if record.name.is_empty() {
            record.name = self.auto_name(record.kind);
        }
        self.records.insert(0, record.clone());
        self.records.truncate(HISTORY_CAP);
        self.save()?;
        Ok(record)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<TimerRecord, HistoryError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(HistoryError::NotFound { id })?;
        let record = self.records.remove(index);
        self.save()?;
        Ok(record)
    }

    pub fn rename(&mut self, id: Uuid, name: &str) -> Result<(), HistoryError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(HistoryError::NotFound { id })?;
        record.name = name.trim().to_string();
        self.save()
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.records.clear();
        self.save()
    }

    /// Serialize the full list to disk, creating the parent directory.
    pub fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HistoryError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, json).map_err(|e| HistoryError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// `{KindLabel}{n}` where `n` is one plus the count of same-kind records
    /// that are unnamed or still carry an auto-generated name. Recomputed at
    /// insertion, never stored.
    fn auto_name(&self, kind: TimerKind) -> String {
        let label = kind.label();
        let count = self
            .records
            .iter()
            .filter(|r| r.kind == kind && (r.name.is_empty() || is_auto_named(&r.name, label)))
            .count();
        format!("{label}{}", count + 1)
    }
}

fn is_auto_named(name: &str, label: &str) -> bool {
    name.strip_prefix(label)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn t(offset_ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::milliseconds(offset_ms)
    }

    fn record(kind: TimerKind, offset_ms: i64) -> TimerRecord {
        TimerRecord::new(kind, t(offset_ms), t(offset_ms + 1_000), 1_000, 0)
    }

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::load(dir.path().join("history.json")).unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_errors_and_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            HistoryStore::load(&path),
            Err(HistoryError::ParseFailed { .. })
        ));

        let (store, warning) = HistoryStore::load_or_empty(&path);
        assert!(store.is_empty());
        assert!(warning.is_some());
    }

    #[test]
    fn round_trips_field_for_field() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store
            .append(record(TimerKind::Stopwatch, 0).named("morning run"))
            .unwrap();
        store
            .append(TimerRecord::new(TimerKind::Countdown, t(5_000), t(8_000), 3_000, 10_000))
            .unwrap();

        let reloaded = HistoryStore::load(store.path()).unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn append_prepends_newest_first() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let first = store.append(record(TimerKind::Stopwatch, 0)).unwrap();
        let second = store.append(record(TimerKind::Stopwatch, 10_000)).unwrap();
        assert_eq!(store.records()[0].id, second.id);
        assert_eq!(store.records()[1].id, first.id);
    }

    #[test]
    fn cap_drops_oldest() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut ids = Vec::new();
        for i in 0..1_005 {
            let appended = store.append(record(TimerKind::Stopwatch, i * 1_000)).unwrap();
            ids.push(appended.id);
        }
        assert_eq!(store.len(), HISTORY_CAP);
        // Newest still first, the five oldest gone.
        assert_eq!(store.records()[0].id, ids[1_004]);
        for dropped in &ids[..5] {
            assert!(store.get(*dropped).is_none());
        }
        assert_eq!(HistoryStore::load(store.path()).unwrap().len(), HISTORY_CAP);
    }

    #[test]
    fn auto_names_count_per_kind() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let s1 = store.append(record(TimerKind::Stopwatch, 0)).unwrap();
        let c1 = store.append(record(TimerKind::Countdown, 0)).unwrap();
        let s2 = store.append(record(TimerKind::Stopwatch, 1_000)).unwrap();
        let c2 = store.append(record(TimerKind::Countdown, 1_000)).unwrap();

        // Kind-prefixed sequences, independent of each other.
        assert_eq!(s1.name, "Stopwatch1");
        assert_eq!(s2.name, "Stopwatch2");
        assert_eq!(c1.name, "Countdown1");
        assert_eq!(c2.name, "Countdown2");
    }

    #[test]
    fn renamed_records_leave_the_sequence() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let s1 = store.append(record(TimerKind::Stopwatch, 0)).unwrap();
        store.rename(s1.id, "sprint review").unwrap();

        // The renamed record no longer matches the auto pattern, so the
        // counter restarts.
        let s2 = store.append(record(TimerKind::Stopwatch, 1_000)).unwrap();
        assert_eq!(s2.name, "Stopwatch1");
    }

    #[test]
    fn explicit_names_are_kept() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let named = store
            .append(record(TimerKind::Stopwatch, 0).named("auto-saved on exit"))
            .unwrap();
        assert_eq!(named.name, "auto-saved on exit");
    }

    #[test]
    fn rename_trims_and_persists() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let rec = store.append(record(TimerKind::Countdown, 0)).unwrap();
        store.rename(rec.id, "  tea timer  ").unwrap();

        let reloaded = HistoryStore::load(store.path()).unwrap();
        assert_eq!(reloaded.get(rec.id).unwrap().name, "tea timer");
    }

    #[test]
    fn remove_returns_the_record() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let rec = store.append(record(TimerKind::Stopwatch, 0)).unwrap();
        let removed = store.remove(rec.id).unwrap();
        assert_eq!(removed.id, rec.id);
        assert!(store.is_empty());
        assert!(HistoryStore::load(store.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_id_is_not_found() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let id = Uuid::new_v4();
        assert!(matches!(store.remove(id), Err(HistoryError::NotFound { .. })));
        assert!(matches!(
            store.rename(id, "x"),
            Err(HistoryError::NotFound { .. })
        ));
    }

    #[test]
    fn clear_empties_and_saves() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.append(record(TimerKind::Stopwatch, 0)).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(HistoryStore::load(store.path()).unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deep").join("history.json");
        let mut store = HistoryStore::load(&nested).unwrap();
        store.append(record(TimerKind::Stopwatch, 0)).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn recent_caps_at_available() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        for i in 0..3 {
            store.append(record(TimerKind::Stopwatch, i * 1_000)).unwrap();
        }
        assert_eq!(store.recent(2).len(), 2);
        assert_eq!(store.recent(50).len(), 3);
    }
}
