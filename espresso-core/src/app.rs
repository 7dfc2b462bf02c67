use crate::config::{FailurePolicy, SyncConfig};
use crate::edit::{bullet, EditKey, TextEditState};
use crate::format::format_last_updated;
use crate::model::NoteId;
use crate::store::NoteStore;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    ConfirmDelete,
    Help,
}

/// Focus area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Editor,
}

/// Editable field of the selected note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
}

/// Platform-agnostic application state.
///
/// `editor` is the only copy of the focused field's text and caret; the
/// front end draws from it and every change to it is written through the
/// store.
pub struct App {
    store: NoteStore,
    editor: TextEditState,
    field: Field,
    pending_delete: Option<NoteId>,
    failure_policy: FailurePolicy,

    pub focus: Focus,
    pub mode: Mode,
    pub running: bool,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new(store: NoteStore, config: &SyncConfig) -> Self {
        let focus = if store.selected_id().is_some() {
            Focus::Editor
        } else {
            Focus::Sidebar
        };

        let mut app = Self {
            store,
            editor: TextEditState::default(),
            field: Field::Content,
            pending_delete: None,
            failure_policy: config.failure_policy,
            focus,
            mode: Mode::Normal,
            running: true,
            status_message: None,
        };
        app.reproject();
        app
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn editor(&self) -> &TextEditState {
        &self.editor
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Text to draw for a field of the selected note
    pub fn field_text(&self, field: Field) -> &str {
        if field == self.field {
            return self.editor.text();
        }
        match (self.store.selected(), field) {
            (Some(note), Field::Title) => &note.title,
            (Some(note), Field::Content) => &note.content,
            (None, _) => "",
        }
    }

    /// Route a keystroke to the focused field. Returns true if the text changed.
    pub fn handle_key(&mut self, key: EditKey) -> bool {
        if self.store.selected_id().is_none() {
            return false;
        }

        let next = match self.field {
            Field::Title if key == EditKey::Enter => {
                self.set_field(Field::Content);
                return false;
            }
            Field::Title => self.editor.apply_default(key, false),
            Field::Content => bullet::apply_key(&self.editor, key),
        };
        self.commit(next)
    }

    /// Replace the selection in the focused field (paste, emoji)
    pub fn insert_text(&mut self, text: &str) -> bool {
        if self.store.selected_id().is_none() {
            return false;
        }

        let text = match self.field {
            // Titles stay on one line
            Field::Title => text.replace(['\r', '\n'], " "),
            Field::Content => text.replace("\r\n", "\n"),
        };
        let next = self.editor.insert_text(&text);
        self.commit(next)
    }

    fn commit(&mut self, next: TextEditState) -> bool {
        let changed = next.text() != self.editor.text();
        if changed {
            if let Some(id) = self.store.selected_id() {
                match self.field {
                    Field::Title => self.store.rename(id, next.text()),
                    Field::Content => self.store.set_content(id, next.text()),
                };
            }
        }
        self.editor = next;
        changed
    }

    /// Switch the edited field, caret at its end
    pub fn set_field(&mut self, field: Field) {
        self.field = field;
        self.reproject();
    }

    pub fn toggle_field(&mut self) {
        self.set_field(match self.field {
            Field::Title => Field::Content,
            Field::Content => Field::Title,
        });
    }

    /// Rebuild the editor from the selected note
    fn reproject(&mut self) {
        let text = match (self.store.selected(), self.field) {
            (Some(note), Field::Title) => note.title.clone(),
            (Some(note), Field::Content) => note.content.clone(),
            (None, _) => String::new(),
        };
        self.editor = TextEditState::at_end(text);
    }

    /// Create an empty note and start editing its title
    pub fn create_note(&mut self) {
        match self.store.create() {
            Ok(_) => {
                self.field = Field::Title;
                self.focus = Focus::Editor;
                self.reproject();
            }
            Err(e) => {
                log::error!("Failed to create note: {}", e);
                self.set_status(&format!("Could not create note: {}", e));
            }
        }
    }

    /// Ask for confirmation before deleting the selected note
    pub fn request_delete(&mut self) {
        if let Some(id) = self.store.selected_id() {
            self.pending_delete = Some(id);
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn pending_delete(&self) -> Option<NoteId> {
        self.pending_delete
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            if self.store.remove(id).is_some() {
                self.reproject();
                if self.store.selected_id().is_none() {
                    self.focus = Focus::Sidebar;
                }
                self.set_status("Note deleted");
            }
        }
        self.mode = Mode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Normal;
    }

    /// Select a note (or none), keeping the current field
    pub fn select_note(&mut self, id: Option<NoteId>) {
        if id == self.store.selected_id() {
            return;
        }
        self.store.select(id);
        self.reproject();
    }

    pub fn clear_selection(&mut self) {
        self.select_note(None);
        self.focus = Focus::Sidebar;
    }

    /// Navigate to next note in the list
    pub fn select_next(&mut self) {
        let count = self.store.notes().len();
        if count == 0 {
            return;
        }
        let index = match self.store.selected_index() {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        };
        self.select_at(index);
    }

    /// Navigate to previous note in the list
    pub fn select_prev(&mut self) {
        let count = self.store.notes().len();
        if count == 0 {
            return;
        }
        let index = match self.store.selected_index() {
            Some(i) => i.saturating_sub(1),
            None => count - 1,
        };
        self.select_at(index);
    }

    fn select_at(&mut self, index: usize) {
        let id = self.store.notes().at(index).map(|n| n.id);
        self.select_note(id);
    }

    /// Toggle focus between sidebar and editor
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Sidebar,
            Focus::Sidebar if self.store.selected_id().is_some() => Focus::Editor,
            Focus::Sidebar => Focus::Sidebar,
        };
    }

    /// Pick up failed background writes
    pub fn poll_sync(&mut self) {
        for failure in self.store.poll_sync_failures() {
            if self.failure_policy == FailurePolicy::Notify {
                self.set_status(&format!(
                    "Could not save note ({}): {}",
                    failure.op.kind(),
                    failure.error
                ));
            }
        }
    }

    /// Flush pending writes and stop
    pub fn quit(&mut self) {
        self.store.flush();
        self.poll_sync();
        self.running = false;
    }

    /// "Last Updated" line for the selected note
    pub fn last_updated_label(&self) -> Option<String> {
        self.store
            .selected()
            .map(|note| format!("Last Updated {}", format_last_updated(note.last_updated)))
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
