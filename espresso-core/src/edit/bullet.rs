//! Smart list typing.
//!
//! Stateless rules applied to a keystroke before the field's default
//! handling:
//!
//! - Space after a `*` that opens a line turns the marker into `◆ `.
//! - Enter on a bullet line with content starts the next line with the
//!   same indentation and a fresh bullet.
//! - Enter on an empty bullet line removes the bullet and the line's
//!   indentation instead of adding another one.
//!
//! Every rule needs a collapsed caret. When nothing matches the engine
//! declines and the host applies the key as usual.

use super::{utf16_len, EditKey, TextEditState};
use crate::model::TextRange;

/// Glyph that marks a list line
pub const BULLET_GLYPH: char = '◆';

/// What starts every bullet line: the glyph and one space
pub const BULLET_PREFIX: &str = "◆ ";

/// Typed character that becomes a bullet
pub const MARKER: char = '*';

/// Apply the first matching rule, or `None` to decline
pub fn transform(state: &TextEditState, key: EditKey) -> Option<TextEditState> {
    if !state.is_collapsed() {
        return None;
    }

    match key {
        EditKey::Char(' ') => convert_marker(state),
        EditKey::Enter => continue_list(state),
        _ => None,
    }
}

/// Host behavior for a multi-line field: the engine first, then the default
pub fn apply_key(state: &TextEditState, key: EditKey) -> TextEditState {
    transform(state, key).unwrap_or_else(|| state.apply_default(key, true))
}

fn convert_marker(state: &TextEditState) -> Option<TextEditState> {
    let head = state.before_cursor().strip_suffix(MARKER)?;
    if !(head.is_empty() || head.ends_with('\n')) {
        return None;
    }

    let marker_start = state.cursor_start() - MARKER.len_utf16();
    Some(state.with_replacement(
        TextRange::new(marker_start, state.cursor_end()),
        BULLET_PREFIX,
    ))
}

/// Enter on a bullet line. An empty bullet is removed together with its
/// indentation, leaving the caret at the start of the emptied line.
fn continue_list(state: &TextEditState) -> Option<TextEditState> {
    let line = state.line_at(state.cursor_start());
    let line_text = state.slice(line);
    let trimmed = line_text.trim_start();
    let rest = trimmed.strip_prefix(BULLET_PREFIX)?;

    if rest.is_empty() {
        return Some(state.with_replacement(line, ""));
    }

    let indent = &line_text[..line_text.len() - trimmed.len()];

    // Enter inside the indentation or the prefix is a plain newline
    let prefix_end = line.start_offset + utf16_len(indent) + utf16_len(BULLET_PREFIX);
    if state.cursor_start() < prefix_end {
        return None;
    }

    let mut inserted = String::with_capacity(1 + indent.len() + BULLET_PREFIX.len());
    inserted.push('\n');
    inserted.push_str(indent);
    inserted.push_str(BULLET_PREFIX);

    Some(state.with_insertion(&inserted, state.selection()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(text: &str, caret: usize, key: EditKey) -> TextEditState {
        apply_key(&TextEditState::with_caret(text, caret), key)
    }

    #[test]
    fn test_marker_at_document_start_becomes_bullet() {
        let next = press("*", 1, EditKey::Char(' '));
        assert_eq!(next.text(), "◆ ");
        assert_eq!(next.cursor_start(), 2);
    }

    #[test]
    fn test_marker_after_newline_becomes_bullet() {
        let next = press("intro\n*", 7, EditKey::Char(' '));
        assert_eq!(next.text(), "intro\n◆ ");
        assert_eq!(next.cursor_start(), 8);
    }

    #[test]
    fn test_marker_mid_line_is_declined() {
        let state = TextEditState::with_caret("a*", 2);
        assert_eq!(transform(&state, EditKey::Char(' ')), None);

        let next = apply_key(&state, EditKey::Char(' '));
        assert_eq!(next.text(), "a* ");
        assert_eq!(next.cursor_start(), 3);
    }

    #[test]
    fn test_indented_marker_is_declined() {
        let state = TextEditState::with_caret("  *", 3);
        assert_eq!(transform(&state, EditKey::Char(' ')), None);
    }

    #[test]
    fn test_marker_keeps_following_text() {
        let next = press("*tail", 1, EditKey::Char(' '));
        assert_eq!(next.text(), "◆ tail");
        assert_eq!(next.cursor_start(), 2);
    }

    #[test]
    fn test_enter_continues_bullet_line() {
        let next = press("◆ item", 6, EditKey::Enter);
        assert_eq!(next.text(), "◆ item\n◆ ");
        assert_eq!(next.cursor_start(), 9);
    }

    #[test]
    fn test_enter_reproduces_indentation() {
        let next = press("  ◆ item", 8, EditKey::Enter);
        assert_eq!(next.text(), "  ◆ item\n  ◆ ");
        assert_eq!(next.cursor_start(), 13);
    }

    #[test]
    fn test_enter_mid_item_splits_into_two_bullets() {
        let next = press("◆ one two\nafter", 5, EditKey::Enter);
        assert_eq!(next.text(), "◆ one\n◆  two\nafter");
        assert_eq!(next.cursor_start(), 8);
    }

    #[test]
    fn test_enter_on_empty_bullet_dedents() {
        let next = press("◆ ", 2, EditKey::Enter);
        assert_eq!(next.text(), "");
        assert_eq!(next.cursor_start(), 0);
    }

    #[test]
    fn test_enter_on_indented_empty_bullet_clears_line() {
        let next = press("◆ a\n    ◆ ", 10, EditKey::Enter);
        assert_eq!(next.text(), "◆ a\n");
        assert_eq!(next.cursor_start(), 4);

        // Lines after the emptied one are untouched
        let next = press("  ◆ \nnext", 4, EditKey::Enter);
        assert_eq!(next.text(), "\nnext");
        assert_eq!(next.cursor_start(), 0);
    }

    #[test]
    fn test_enter_on_plain_line_is_declined() {
        let state = TextEditState::with_caret("plain", 5);
        assert_eq!(transform(&state, EditKey::Enter), None);
        assert_eq!(apply_key(&state, EditKey::Enter).text(), "plain\n");
    }

    #[test]
    fn test_enter_before_prefix_is_declined() {
        let state = TextEditState::with_caret("◆ item", 0);
        assert_eq!(transform(&state, EditKey::Enter), None);
    }

    #[test]
    fn test_selection_declines_every_rule() {
        let state = TextEditState::new("◆ item", 2, 6);
        assert_eq!(transform(&state, EditKey::Enter), None);

        let state = TextEditState::new("*x", 1, 2);
        assert_eq!(transform(&state, EditKey::Char(' ')), None);
    }

    #[test]
    fn test_other_keys_are_declined() {
        let state = TextEditState::with_caret("*", 1);
        assert_eq!(transform(&state, EditKey::Char('x')), None);
        assert_eq!(transform(&state, EditKey::Backspace), None);
    }

    #[test]
    fn test_bullet_only_applies_to_line_with_caret() {
        let next = press("◆ a\nplain", 9, EditKey::Enter);
        assert_eq!(next.text(), "◆ a\nplain\n");
    }
}
