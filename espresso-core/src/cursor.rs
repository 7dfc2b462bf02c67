use crate::edit::{byte_offset, utf16_len};
use crate::model::TextRange;

/// Row/column translation for a block of text.
///
/// Offsets and columns are UTF-16 code units, matching [`TextEditState`].
///
/// [`TextEditState`]: crate::edit::TextEditState
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Offset at which each line starts
    line_starts: Vec<usize>,
    /// Total length of the text
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut offset = 0;

        for c in text.chars() {
            offset += c.len_utf16();
            if c == '\n' {
                line_starts.push(offset);
            }
        }

        Self {
            line_starts,
            len: offset,
        }
    }

    /// Number of lines; an empty text still has one
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Range of a line, excluding its newline
    pub fn line_range(&self, row: usize) -> TextRange {
        let row = row.min(self.line_count() - 1);
        let start = self.line_starts[row];
        let end = match self.line_starts.get(row + 1) {
            Some(next) => next - 1,
            None => self.len,
        };
        TextRange::new(start, end)
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.line_range(row).len()
    }

    /// Convert an offset to (row, col)
    pub fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        (row, offset - self.line_starts[row])
    }

    /// Convert (row, col) to an offset, clamping the column to the line
    pub fn position_to_offset(&self, row: usize, col: usize) -> usize {
        let range = self.line_range(row);
        range.start_offset + col.min(range.len())
    }
}

/// Number of chars before a UTF-16 column on a line, for placing a terminal caret
pub fn display_column(line: &str, col: usize) -> usize {
    line[..byte_offset(line, col.min(utf16_len(line)))].chars().count()
}
