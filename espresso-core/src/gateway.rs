//! The persistence boundary.
//!
//! Every mutating operation is keyed by stable id; list positions never
//! cross this interface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{NoteId, NoteRecord};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Note {0} not found")]
    NotFound(NoteId),

    #[error("Note id {0} is already in use")]
    DuplicateId(NoteId),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Backend store the note collection is mirrored to
pub trait SyncGateway: Send + Sync {
    /// All persisted notes in creation order
    fn load_all(&self) -> Result<Vec<NoteRecord>, GatewayError>;

    /// Persist a new note and assign its id
    fn create(&self, title: &str, content: &str) -> Result<NoteRecord, GatewayError>;

    fn update_title(&self, id: NoteId, title: &str) -> Result<(), GatewayError>;

    fn update_content(&self, id: NoteId, content: &str) -> Result<(), GatewayError>;

    /// Deleting an absent id succeeds
    fn delete(&self, id: NoteId) -> Result<(), GatewayError>;
}

/// Gateway that keeps notes in process memory
#[derive(Debug, Default)]
pub struct MemoryGateway {
    notes: Mutex<Vec<NoteRecord>>,
    offline: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<NoteRecord>) -> Self {
        Self {
            notes: Mutex::new(records),
            offline: AtomicBool::new(false),
        }
    }

    /// While offline every operation fails with `Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of the stored notes
    pub fn records(&self) -> Vec<NoteRecord> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NoteRecord>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable("memory gateway is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn update<F>(&self, id: NoteId, f: F) -> Result<(), GatewayError>
    where
        F: FnOnce(&mut NoteRecord),
    {
        self.check_online()?;
        let mut notes = self.lock();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(GatewayError::NotFound(id))?;
        f(note);
        note.last_updated = Some(Utc::now());
        Ok(())
    }
}

impl SyncGateway for MemoryGateway {
    fn load_all(&self) -> Result<Vec<NoteRecord>, GatewayError> {
        self.check_online()?;
        Ok(self.records())
    }

    fn create(&self, title: &str, content: &str) -> Result<NoteRecord, GatewayError> {
        self.check_online()?;
        let note = NoteRecord::new(Uuid::new_v4(), title.to_string(), content.to_string());
        self.lock().push(note.clone());
        Ok(note)
    }

    fn update_title(&self, id: NoteId, title: &str) -> Result<(), GatewayError> {
        self.update(id, |n| n.title = title.to_string())
    }

    fn update_content(&self, id: NoteId, content: &str) -> Result<(), GatewayError> {
        self.update(id, |n| n.content = content.to_string())
    }

    fn delete(&self, id: NoteId) -> Result<(), GatewayError> {
        self.check_online()?;
        self.lock().retain(|n| n.id != id);
        Ok(())
    }
}
