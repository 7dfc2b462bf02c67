use std::sync::Arc;

use crate::collection::{NoteCollection, SelectionTracker};
use crate::config::SyncConfig;
use crate::gateway::{GatewayError, SyncGateway};
use crate::model::{NoteId, NoteRecord};
use crate::sync::{SyncFailure, SyncOp, SyncWorker};

/// The note collection, its selection, and the gateway it mirrors.
///
/// Edits are optimistic: the local record changes first and the matching
/// write is queued behind earlier ones. A failed write never rolls back
/// local state.
pub struct NoteStore {
    notes: NoteCollection,
    selection: SelectionTracker,
    gateway: Arc<dyn SyncGateway>,
    sync: SyncWorker,
}

impl NoteStore {
    /// Load every persisted note and start the background writer.
    /// The first note, if any, starts selected.
    pub fn load(gateway: Arc<dyn SyncGateway>, config: &SyncConfig) -> Result<Self, GatewayError> {
        let notes = NoteCollection::from_records(gateway.load_all()?);
        log::info!("Loaded {} notes", notes.len());

        let sync = SyncWorker::spawn(Arc::clone(&gateway), config.retry_attempts)?;

        let mut selection = SelectionTracker::default();
        selection.select(notes.at(0).map(|n| n.id), &notes);

        Ok(Self {
            notes,
            selection,
            gateway,
            sync,
        })
    }

    pub fn notes(&self) -> &NoteCollection {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&NoteRecord> {
        self.notes.get(id)
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.selection.selected()
    }

    pub fn selected(&self) -> Option<&NoteRecord> {
        self.selection.selected().and_then(|id| self.notes.get(id))
    }

    /// Display position of the selected note
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.display_index(&self.notes)
    }

    /// # Panics
    ///
    /// Panics if `id` is not a note in this store.
    pub fn select(&mut self, id: Option<NoteId>) {
        self.selection.select(id, &self.notes);
    }

    /// Create an empty note through the gateway, append it and select it.
    /// Nothing changes locally if the gateway refuses.
    ///
    /// Queued writes are drained first so the create reaches the gateway
    /// after every earlier local mutation.
    pub fn create(&mut self) -> Result<NoteId, GatewayError> {
        self.sync.flush();
        let record = self.gateway.create("", "")?;
        let id = record.id;
        if !self.notes.push(record) {
            return Err(GatewayError::DuplicateId(id));
        }
        log::debug!("Created note {}", id);
        self.selection.select(Some(id), &self.notes);
        Ok(id)
    }

    /// Returns false if the note does not exist
    pub fn rename(&mut self, id: NoteId, title: impl Into<String>) -> bool {
        let Some(note) = self.notes.get_mut(id) else {
            log::warn!("Rename of unknown note {}", id);
            return false;
        };
        note.set_title(title.into());
        let title = note.title.clone();
        self.sync.enqueue(SyncOp::UpdateTitle { id, title });
        true
    }

    /// Returns false if the note does not exist
    pub fn set_content(&mut self, id: NoteId, content: impl Into<String>) -> bool {
        let Some(note) = self.notes.get_mut(id) else {
            log::warn!("Content change for unknown note {}", id);
            return false;
        };
        note.set_content(content.into());
        let content = note.content.clone();
        self.sync.enqueue(SyncOp::UpdateContent { id, content });
        true
    }

    /// Remove a note. A removed selection moves to the note that takes its
    /// place in the list, else the one before it, else nothing.
    pub fn remove(&mut self, id: NoteId) -> Option<NoteRecord> {
        let (index, record) = self.notes.remove(id)?;
        self.sync.enqueue(SyncOp::Delete { id });
        self.selection.note_removed(id, index, &self.notes);
        log::debug!("Removed note {} from position {}", id, index);
        Some(record)
    }

    /// Writes the gateway refused since the last call
    pub fn poll_sync_failures(&self) -> Vec<SyncFailure> {
        self.sync.take_failures()
    }

    /// Wait for every queued write to be attempted
    pub fn flush(&self) {
        self.sync.flush();
    }
}
