//! Persistence adapter: the whole collection lives in one serialized slot.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use planify_core::Appointment;
use tracing::warn;

/// One read/write/clear slot holding the serialized collection as a blob.
pub trait StorageBackend {
    /// The current blob, or `None` when the slot has never been written.
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, blob: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// A single JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        Ok(Some(blob))
    }

    fn write(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&self.path, blob).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// In-memory slot for tests and embedded consumers.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(blob.into())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&self, blob: &str) -> Result<()> {
        *self.slot.borrow_mut() = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// Read the stored collection.
///
/// An absent slot is an empty collection. A blob that is not a JSON array
/// is discarded: the slot is cleared and the session continues empty.
/// Individual elements that fail to decode are skipped so one bad record
/// cannot poison the rest; the slot is left intact in that case.
pub fn load(storage: &impl StorageBackend) -> Result<Vec<Appointment>> {
    let Some(blob) = storage.read()? else {
        return Ok(Vec::new());
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&blob) {
        Ok(values) => values,
        Err(err) => {
            warn!("discarding corrupt appointment blob: {err}");
            storage.clear()?;
            return Ok(Vec::new());
        }
    };

    let mut appointments = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<Appointment>(value) {
            Ok(appointment) => appointments.push(appointment),
            Err(err) => warn!("skipping malformed appointment record: {err}"),
        }
    }
    Ok(appointments)
}

/// Serialize the full collection and overwrite the slot unconditionally.
/// Called after every mutation; there is no partial or batched write.
pub fn save(storage: &impl StorageBackend, appointments: &[Appointment]) -> Result<()> {
    let blob = serde_json::to_string(appointments).context("serialize appointments")?;
    storage.write(&blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use planify_core::AppointmentDraft;

    fn appointment(id: &str) -> Appointment {
        let draft = AppointmentDraft::new(
            "Standup",
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Appointment::from_draft(id, draft, now)
    }

    #[test]
    fn absent_slot_loads_empty() {
        let storage = MemoryStorage::new();
        assert!(load(&storage).unwrap().is_empty());
        assert!(storage.blob().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = MemoryStorage::new();
        let appointments = vec![appointment("a1"), appointment("a2")];
        save(&storage, &appointments).unwrap();
        assert_eq!(load(&storage).unwrap(), appointments);
    }

    #[test]
    fn corrupt_blob_clears_the_slot() {
        let storage = MemoryStorage::with_blob("{not json");
        assert!(load(&storage).unwrap().is_empty());
        assert!(storage.blob().is_none());

        // A JSON value of the wrong shape counts as corrupt too.
        let storage = MemoryStorage::with_blob(r#"{"appointments": []}"#);
        assert!(load(&storage).unwrap().is_empty());
        assert!(storage.blob().is_none());
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let good = serde_json::to_value(appointment("a1")).unwrap();
        let blob = serde_json::json!([good, {"id": "a2", "title": "no date"}]).to_string();

        let storage = MemoryStorage::with_blob(blob);
        let loaded = load(&storage).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "a1");
        // Per-record failures keep the slot.
        assert!(storage.blob().is_some());
    }
}
