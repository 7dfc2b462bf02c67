use crate::cursor::LineIndex;
use crate::model::TextRange;

use super::{byte_offset, utf16_len, EditKey};

/// Content and caret of one editable text field.
///
/// Offsets are UTF-16 code units with
/// `cursor_start <= cursor_end <= utf16_len(text)`. The type never clamps;
/// callers hand it valid offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextEditState {
    text: String,
    cursor_start: usize,
    cursor_end: usize,
}

impl TextEditState {
    pub fn new(text: impl Into<String>, cursor_start: usize, cursor_end: usize) -> Self {
        let text = text.into();
        debug_assert!(cursor_start <= cursor_end && cursor_end <= utf16_len(&text));
        Self {
            text,
            cursor_start,
            cursor_end,
        }
    }

    /// A state with the caret collapsed at `offset`
    pub fn with_caret(text: impl Into<String>, offset: usize) -> Self {
        Self::new(text, offset, offset)
    }

    /// A state with the caret collapsed after the last character
    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = utf16_len(&text);
        Self::new(text, end, end)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_start(&self) -> usize {
        self.cursor_start
    }

    pub fn cursor_end(&self) -> usize {
        self.cursor_end
    }

    pub fn selection(&self) -> TextRange {
        TextRange::new(self.cursor_start, self.cursor_end)
    }

    pub fn is_collapsed(&self) -> bool {
        self.cursor_start == self.cursor_end
    }

    pub fn len(&self) -> usize {
        utf16_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text covered by `range`
    pub fn slice(&self, range: TextRange) -> &str {
        let start = byte_offset(&self.text, range.start_offset);
        let end = byte_offset(&self.text, range.end_offset);
        &self.text[start..end]
    }

    /// Text before the start of the selection
    pub fn before_cursor(&self) -> &str {
        &self.text[..byte_offset(&self.text, self.cursor_start)]
    }

    /// Range of the line containing `offset`, excluding its newline
    pub fn line_at(&self, offset: usize) -> TextRange {
        let index = LineIndex::new(&self.text);
        let (row, _) = index.offset_to_position(offset);
        index.line_range(row)
    }

    /// Insert `inserted` over `range`, caret after the inserted text
    pub fn with_insertion(&self, inserted: &str, range: TextRange) -> Self {
        self.with_replacement(range, inserted)
    }

    /// Replace `range` with `new_text`, caret after the replacement
    pub fn with_replacement(&self, range: TextRange, new_text: &str) -> Self {
        let start = byte_offset(&self.text, range.start_offset);
        let end = byte_offset(&self.text, range.end_offset);

        let mut text = String::with_capacity(self.text.len() - (end - start) + new_text.len());
        text.push_str(&self.text[..start]);
        text.push_str(new_text);
        text.push_str(&self.text[end..]);

        Self::with_caret(text, range.start_offset + utf16_len(new_text))
    }

    /// Replace the selection with `inserted` (typing, paste, emoji)
    pub fn insert_text(&self, inserted: &str) -> Self {
        self.with_insertion(inserted, self.selection())
    }

    /// Move the caret, collapsing any selection
    pub fn with_cursor(&self, offset: usize) -> Self {
        Self::with_caret(self.text.clone(), offset)
    }

    /// What a plain text field does with `key`.
    ///
    /// Single-line fields ignore Enter.
    pub fn apply_default(&self, key: EditKey, multiline: bool) -> Self {
        match key {
            EditKey::Char(c) => {
                let mut buf = [0u8; 4];
                self.insert_text(c.encode_utf8(&mut buf))
            }
            EditKey::Enter if multiline => self.insert_text("\n"),
            EditKey::Enter => self.clone(),
            EditKey::Backspace => {
                if !self.is_collapsed() {
                    self.insert_text("")
                } else {
                    match self.char_before(self.cursor_start) {
                        Some(c) => self.with_replacement(
                            TextRange::new(self.cursor_start - c.len_utf16(), self.cursor_start),
                            "",
                        ),
                        None => self.clone(),
                    }
                }
            }
            EditKey::Delete => {
                if !self.is_collapsed() {
                    self.insert_text("")
                } else {
                    match self.char_after(self.cursor_end) {
                        Some(c) => self.with_replacement(
                            TextRange::new(self.cursor_end, self.cursor_end + c.len_utf16()),
                            "",
                        ),
                        None => self.clone(),
                    }
                }
            }
            EditKey::Left => {
                if !self.is_collapsed() {
                    self.with_cursor(self.cursor_start)
                } else {
                    let step = self.char_before(self.cursor_start).map_or(0, char::len_utf16);
                    self.with_cursor(self.cursor_start - step)
                }
            }
            EditKey::Right => {
                if !self.is_collapsed() {
                    self.with_cursor(self.cursor_end)
                } else {
                    let step = self.char_after(self.cursor_end).map_or(0, char::len_utf16);
                    self.with_cursor(self.cursor_end + step)
                }
            }
            EditKey::Home => self.with_cursor(self.line_at(self.cursor_start).start_offset),
            EditKey::End => self.with_cursor(self.line_at(self.cursor_end).end_offset),
            EditKey::Up => self.move_vertically(false),
            EditKey::Down => self.move_vertically(true),
        }
    }

    fn move_vertically(&self, down: bool) -> Self {
        let index = LineIndex::new(&self.text);
        let (row, col) = index.offset_to_position(self.cursor_end);
        let target = if down {
            if row + 1 >= index.line_count() {
                return self.with_cursor(self.len());
            }
            row + 1
        } else {
            if row == 0 {
                return self.with_cursor(0);
            }
            row - 1
        };

        let mut offset = index.position_to_offset(target, col);
        // Never leave the caret between the halves of a surrogate pair
        let line = index.line_range(target);
        let line_text = self.slice(line);
        let units = utf16_len(&line_text[..byte_offset(line_text, offset - line.start_offset)]);
        offset = line.start_offset + units;
        self.with_cursor(offset)
    }

    fn char_before(&self, offset: usize) -> Option<char> {
        self.text[..byte_offset(&self.text, offset)].chars().next_back()
    }

    fn char_after(&self, offset: usize) -> Option<char> {
        self.text[byte_offset(&self.text, offset)..].chars().next()
    }
}
