//! JSON file persistence for notes

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use espresso_core::model::lenient_timestamp;
use espresso_core::{GatewayError, NoteId, NoteRecord, SyncGateway};

/// A note as found on disk. Files written before notes had ids lack `id`.
#[derive(Debug, Deserialize)]
struct StoredNote {
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, with = "lenient_timestamp")]
    last_updated: Option<DateTime<Utc>>,
}

/// Gateway keeping every note in one JSON array.
///
/// Each operation reads the file, applies the change and replaces the file
/// atomically. A lock serialises callers within the process.
pub struct JsonFileGateway {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all notes, giving fresh ids to any that have none.
    /// The flag reports whether ids were assigned.
    fn read(&self) -> Result<(Vec<NoteRecord>, bool), GatewayError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((Vec::new(), false)),
            Err(e) => return Err(e.into()),
        };
        if json.trim().is_empty() {
            return Ok((Vec::new(), false));
        }

        let stored: Vec<StoredNote> = serde_json::from_str(&json)?;
        let mut migrated = false;
        let notes = stored
            .into_iter()
            .map(|s| {
                let id = s.id.unwrap_or_else(|| {
                    migrated = true;
                    Uuid::new_v4()
                });
                NoteRecord {
                    id,
                    title: s.title,
                    content: s.content,
                    last_updated: s.last_updated,
                }
            })
            .collect();
        Ok((notes, migrated))
    }

    fn write(&self, notes: &[NoteRecord]) -> Result<(), GatewayError> {
        let json = serde_json::to_string_pretty(notes)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read, change and write back under the lock
    fn modify<R, F>(&self, f: F) -> Result<R, GatewayError>
    where
        F: FnOnce(&mut Vec<NoteRecord>) -> Result<Option<R>, GatewayError>,
        R: Default,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut notes, migrated) = self.read()?;
        match f(&mut notes)? {
            Some(result) => {
                self.write(&notes)?;
                Ok(result)
            }
            None => {
                if migrated {
                    self.write(&notes)?;
                }
                Ok(R::default())
            }
        }
    }

    fn update<F>(&self, id: NoteId, f: F) -> Result<(), GatewayError>
    where
        F: FnOnce(&mut NoteRecord),
    {
        self.modify(|notes| {
            let note = notes
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or(GatewayError::NotFound(id))?;
            f(note);
            note.touch();
            Ok(Some(()))
        })
    }
}

impl SyncGateway for JsonFileGateway {
    fn load_all(&self) -> Result<Vec<NoteRecord>, GatewayError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (notes, migrated) = self.read()?;
        if migrated {
            log::info!("Assigned ids to legacy notes in {}", self.path.display());
            self.write(&notes)?;
        }
        Ok(notes)
    }

    fn create(&self, title: &str, content: &str) -> Result<NoteRecord, GatewayError> {
        let note = NoteRecord::new(Uuid::new_v4(), title.to_string(), content.to_string());
        let created = note.clone();
        self.modify(move |notes| {
            notes.push(note);
            Ok(Some(()))
        })?;
        Ok(created)
    }

    fn update_title(&self, id: NoteId, title: &str) -> Result<(), GatewayError> {
        self.update(id, |n| n.title = title.to_string())
    }

    fn update_content(&self, id: NoteId, content: &str) -> Result<(), GatewayError> {
        self.update(id, |n| n.content = content.to_string())
    }

    fn delete(&self, id: NoteId) -> Result<(), GatewayError> {
        self.modify(|notes| {
            let before = notes.len();
            notes.retain(|n| n.id != id);
            Ok((notes.len() != before).then_some(()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_in(dir: &tempfile::TempDir) -> JsonFileGateway {
        JsonFileGateway::new(dir.path().join("notes.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway_in(&dir);
        assert!(gateway.load_all().unwrap().is_empty());
        assert!(!gateway.path().exists());
    }

    #[test]
    fn test_notes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway_in(&dir);
        let a = gateway.create("", "").unwrap();
        let b = gateway.create("", "").unwrap();
        gateway.update_title(a.id, "Groceries").unwrap();
        gateway.update_content(b.id, "◆ call mom").unwrap();

        let reopened = gateway_in(&dir).load_all().unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened[0].id, a.id);
        assert_eq!(reopened[0].title, "Groceries");
        assert_eq!(reopened[1].content, "◆ call mom");
        assert!(reopened[1].last_updated.is_some());
    }

    #[test]
    fn test_legacy_notes_get_stable_ids() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("notes.json"),
            r#"[{"title":"old","content":"text","last_updated":"2024-01-02T03:04:05.123456789-05:00"},
                {"title":"older","content":"","last_updated":"garbage"}]"#,
        )
        .unwrap();
        let gateway = gateway_in(&dir);

        let first = gateway.load_all().unwrap();
        let second = gateway.load_all().unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].title, "old");
        assert!(first[0].last_updated.is_some());
        assert_eq!(first[1].last_updated, None);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway_in(&dir);
        let a = gateway.create("a", "").unwrap();
        let b = gateway.create("b", "").unwrap();

        gateway.delete(a.id).unwrap();
        gateway.delete(a.id).unwrap();

        let notes = gateway.load_all().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, b.id);
    }

    #[test]
    fn test_update_of_unknown_note_fails() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway_in(&dir);
        gateway.create("", "").unwrap();

        let err = gateway.update_content(Uuid::new_v4(), "x").unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.json"), "[{").unwrap();
        let err = gateway_in(&dir).load_all().unwrap_err();
        assert!(matches!(err, GatewayError::Serialization(_)));
    }
}
