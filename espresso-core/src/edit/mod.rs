//! Text field editing: the caret-aware value type and the auto-bullet rules
//! applied on top of it.

pub mod bullet;
mod state;

pub use bullet::{BULLET_GLYPH, BULLET_PREFIX, MARKER};
pub use state::TextEditState;

/// A keystroke offered to a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// Length of `s` in UTF-16 code units
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index of the first char boundary at or after `offset` UTF-16 units.
/// Offsets past the end map to `s.len()`.
pub fn byte_offset(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for (i, c) in s.char_indices() {
        if units >= offset {
            return i;
        }
        units += c.len_utf16();
    }
    s.len()
}
