mod note;
mod text_range;

pub use note::{lenient_timestamp, NoteId, NoteRecord, UNTITLED};
pub use text_range::TextRange;
