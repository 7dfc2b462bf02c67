//! Espresso Core - Platform-agnostic note-taking library
//!
//! This crate keeps an ordered collection of notes in sync with a backend
//! store and turns keystrokes into text edits, including smart bullet
//! lists. Front ends own an [`App`] and draw from it.

pub mod app;
pub mod collection;
pub mod config;
pub mod cursor;
pub mod edit;
pub mod format;
pub mod gateway;
pub mod model;
pub mod store;
pub mod sync;

pub use app::{App, Field, Focus, Mode};
pub use collection::{NoteCollection, SelectionTracker};
pub use config::{Config, FailurePolicy, SyncConfig};
pub use cursor::LineIndex;
pub use edit::{EditKey, TextEditState};
pub use format::{format_last_updated, INVALID_DATE};
pub use gateway::{GatewayError, MemoryGateway, SyncGateway};
pub use model::{NoteId, NoteRecord, TextRange};
pub use store::NoteStore;
pub use sync::{SyncFailure, SyncOp, SyncWorker};
