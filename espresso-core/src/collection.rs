use crate::model::{NoteId, NoteRecord};

/// In-memory mirror of the persisted notes, in creation order
#[derive(Debug, Clone, Default)]
pub struct NoteCollection {
    notes: Vec<NoteRecord>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded records, keeping the first record for any repeated id
    pub fn from_records(records: Vec<NoteRecord>) -> Self {
        let mut collection = Self::new();
        for record in records {
            let id = record.id;
            if !collection.push(record) {
                log::warn!("Skipping note with duplicate id {}", id);
            }
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteRecord> {
        self.notes.iter()
    }

    pub fn as_slice(&self) -> &[NoteRecord] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&NoteRecord> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: NoteId) -> Option<&mut NoteRecord> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    /// Display position of a note
    pub fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    /// Note at a display position
    pub fn at(&self, index: usize) -> Option<&NoteRecord> {
        self.notes.get(index)
    }

    /// Append a record. Returns false if its id is already present.
    pub fn push(&mut self, record: NoteRecord) -> bool {
        if self.contains(record.id) {
            return false;
        }
        self.notes.push(record);
        true
    }

    /// Remove a record, returning the position it occupied
    pub fn remove(&mut self, id: NoteId) -> Option<(usize, NoteRecord)> {
        let pos = self.position(id)?;
        Some((pos, self.notes.remove(pos)))
    }
}

/// The currently active note, tracked by identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: Option<NoteId>,
}

impl SelectionTracker {
    pub fn selected(&self) -> Option<NoteId> {
        self.selected
    }

    /// Select a note or clear the selection.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in `notes`.
    pub fn select(&mut self, id: Option<NoteId>, notes: &NoteCollection) {
        if let Some(id) = id {
            assert!(notes.contains(id), "selected note {} is not in the collection", id);
        }
        self.selected = id;
    }

    /// Update after `removed` left `notes` from position `index`.
    ///
    /// A removed selection moves to the note now at that position, then
    /// to the one before it, then to nothing.
    pub fn note_removed(&mut self, removed: NoteId, index: usize, notes: &NoteCollection) {
        if self.selected != Some(removed) {
            return;
        }

        self.selected = notes
            .at(index)
            .or_else(|| index.checked_sub(1).and_then(|prev| notes.at(prev)))
            .map(|n| n.id);
    }

    /// Position of the selection, computed at render time
    pub fn display_index(&self, notes: &NoteCollection) -> Option<usize> {
        self.selected.and_then(|id| notes.position(id))
    }
}
