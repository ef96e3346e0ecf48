//! Line/column addressable document buffer
//!
//! `TextBuffer` owns the document text and the current selection. All
//! positions are toolkit independent: 0-based lines and 0-based columns
//! counted in characters. The editor widget talks in character indices and
//! converts at the boundary with [`TextBuffer::position_of_char_index`] and
//! [`TextBuffer::char_index_of`].

use crate::error::{Error, Result};
use crate::string_utils::{
    byte_index_to_char_index, char_index_to_byte_index, char_len, floor_char_boundary,
};

// ─────────────────────────────────────────────────────────────────────────────
// Positions and Selection
// ─────────────────────────────────────────────────────────────────────────────

/// A line/column position in the document (both 0-based).
///
/// The derived ordering is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The current selection: either a bare caret or a non-empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// No text selected; the caret is a single insertion point.
    Caret(Position),
    /// Selected text, `start < end` in document order.
    Range { start: Position, end: Position },
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Caret(Position::default())
    }
}

impl Selection {
    /// Build a selection between two positions in any order.
    ///
    /// Equal positions collapse to a caret.
    pub fn between(a: Position, b: Position) -> Self {
        match a.cmp(&b) {
            std::cmp::Ordering::Equal => Selection::Caret(a),
            std::cmp::Ordering::Less => Selection::Range { start: a, end: b },
            std::cmp::Ordering::Greater => Selection::Range { start: b, end: a },
        }
    }

    /// The insertion point. For a range this is its end.
    pub fn caret(&self) -> Position {
        match *self {
            Selection::Caret(pos) => pos,
            Selection::Range { end, .. } => end,
        }
    }

    /// The first position covered by the selection.
    pub fn start(&self) -> Position {
        match *self {
            Selection::Caret(pos) => pos,
            Selection::Range { start, .. } => start,
        }
    }

    /// The selected range, if any text is selected.
    pub fn range(&self) -> Option<(Position, Position)> {
        match *self {
            Selection::Caret(_) => None,
            Selection::Range { start, end } => Some((start, end)),
        }
    }

    /// Whether no text is selected.
    pub fn is_caret(&self) -> bool {
        matches!(self, Selection::Caret(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edits
// ─────────────────────────────────────────────────────────────────────────────

/// A single edit expressed in pre-edit coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert text at a position.
    Insert { at: Position, text: String },
    /// Replace the text between two positions.
    Replace {
        start: Position,
        end: Position,
        text: String,
    },
}

impl Edit {
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Edit::Insert {
            at,
            text: text.into(),
        }
    }

    pub fn replace(start: Position, end: Position, text: impl Into<String>) -> Self {
        Edit::Replace {
            start,
            end,
            text: text.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TextBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable document text with line/column addressing and a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: Selection,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer seeded with text, caret at the start.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: Selection::default(),
        }
    }

    /// The whole document as one string. This is the render input.
    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole document and reset the caret to the start.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = Selection::default();
    }

    /// Direct access for the text widget, which edits the string in place.
    ///
    /// Callers must refresh the selection afterwards.
    pub(crate) fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Addressing
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of lines. An empty document has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Content of a line without its line terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.line_bounds(line).map(|(start, end)| &self.text[start..end])
    }

    /// Length of a line in characters.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(char_len)
    }

    /// Position just past the last character of the document.
    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.line_len(last).unwrap_or(0))
    }

    /// Byte range of a line, excluding `\n` and a trailing `\r`.
    fn line_bounds(&self, line: usize) -> Option<(usize, usize)> {
        let start = if line == 0 {
            0
        } else {
            self.text.match_indices('\n').nth(line - 1).map(|(i, _)| i + 1)?
        };
        let mut end = self.text[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.text.len());
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some((start, end))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Coordinate Conversion
    // ─────────────────────────────────────────────────────────────────────────

    /// Byte offset of a position, or `OutOfRange` if it is outside the document.
    pub fn offset_of(&self, pos: Position) -> Result<usize> {
        let out_of_range = Error::OutOfRange {
            line: pos.line,
            column: pos.column,
        };
        let (start, end) = self.line_bounds(pos.line).ok_or(out_of_range)?;
        let line = &self.text[start..end];
        if pos.column > char_len(line) {
            return Err(Error::OutOfRange {
                line: pos.line,
                column: pos.column,
            });
        }
        Ok(start + char_index_to_byte_index(line, pos.column))
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position_of_offset(&self, offset: usize) -> Position {
        let offset = floor_char_boundary(&self.text, offset);
        let before = &self.text[..offset];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = char_len(&before[line_start..]);
        // A caret between '\r' and '\n' belongs at the end of the line.
        match self.line_len(line) {
            Some(len) if column > len => Position::new(line, len),
            _ => Position::new(line, column),
        }
    }

    /// Character index (as used by text widgets) of a position.
    pub fn char_index_of(&self, pos: Position) -> Result<usize> {
        let offset = self.offset_of(pos)?;
        Ok(byte_index_to_char_index(&self.text, offset))
    }

    /// Position of a widget character index, clamped to the document.
    pub fn position_of_char_index(&self, char_index: usize) -> Position {
        self.position_of_offset(char_index_to_byte_index(&self.text, char_index))
    }

    /// Clamp a possibly stale position into the document.
    pub fn clamp_position(&self, pos: Position) -> Position {
        if self.offset_of(pos).is_ok() {
            return pos;
        }
        if pos.line < self.line_count() {
            Position::new(pos.line, self.line_len(pos.line).unwrap_or(0))
        } else {
            self.end_position()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Current selection or collapsed caret.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection. Both ends must lie inside the document.
    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        match selection {
            Selection::Caret(pos) => {
                self.offset_of(pos)?;
            }
            Selection::Range { start, end } => {
                self.offset_of(start)?;
                self.offset_of(end)?;
            }
        }
        self.selection = selection;
        Ok(())
    }

    /// Set the selection from two widget character indices (any order).
    pub fn set_selection_chars(&mut self, primary: usize, secondary: usize) {
        let a = self.position_of_char_index(primary);
        let b = self.position_of_char_index(secondary);
        self.selection = Selection::between(a, b);
    }

    /// The selected text, empty for a caret.
    pub fn selected_text(&self) -> &str {
        match self.selection.range() {
            Some((start, end)) => match (self.offset_of(start), self.offset_of(end)) {
                (Ok(s), Ok(e)) => &self.text[s..e],
                _ => "",
            },
            None => "",
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert text at a position. The caret moves past the inserted text.
    pub fn insert_at(&mut self, pos: Position, text: &str) -> Result<()> {
        let offset = self.offset_of(pos)?;
        self.splice(offset, offset, text);
        Ok(())
    }

    /// Replace the text between two positions (in any order). The caret
    /// moves past the replacement.
    pub fn replace_range(&mut self, start: Position, end: Position, text: &str) -> Result<()> {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let s = self.offset_of(start)?;
        let e = self.offset_of(end)?;
        self.splice(s, e, text);
        Ok(())
    }

    fn splice(&mut self, start: usize, end: usize, text: &str) {
        self.text.replace_range(start..end, text);
        self.selection = Selection::Caret(self.position_of_offset(start + text.len()));
    }

    /// Apply edits computed against the current (pre-edit) coordinates.
    ///
    /// All edits are validated first; if any is out of range or two replaced
    /// ranges overlap, nothing is changed. Edits are applied from the highest
    /// offset down, and edits sharing an offset keep their list order in the
    /// resulting text. The caret ends up just past the last edit in the
    /// document.
    pub fn apply_edits(&mut self, edits: &[Edit]) -> Result<()> {
        let mut resolved = Vec::with_capacity(edits.len());
        for (index, edit) in edits.iter().enumerate() {
            let (start, end) = match edit {
                Edit::Insert { at, .. } => {
                    let offset = self.offset_of(*at)?;
                    (offset, offset)
                }
                Edit::Replace { start, end, .. } => {
                    let s = self.offset_of(*start)?;
                    let e = self.offset_of(*end)?;
                    if s > e {
                        return Err(Error::OutOfRange {
                            line: end.line,
                            column: end.column,
                        });
                    }
                    (s, e)
                }
            };
            resolved.push((index, start, end, edit));
        }

        // Highest offset first; among equal offsets the later edit goes first
        // so the earlier one ends up in front of it.
        resolved.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        for pair in resolved.windows(2) {
            let (higher, lower) = (&pair[0], &pair[1]);
            if lower.2 > higher.1 {
                return Err(Error::Application(
                    "Overlapping edits cannot be applied together".to_string(),
                ));
            }
        }

        // Positions below an applied edit are untouched by it, so each edit
        // is still valid in its original coordinates when its turn comes.
        let mut caret: Option<usize> = None;
        for (_, start, end, edit) in resolved {
            let inserted = match edit {
                Edit::Insert { at, text } => {
                    self.insert_at(*at, text)?;
                    text.len()
                }
                Edit::Replace { start, end, text } => {
                    self.replace_range(*start, *end, text)?;
                    text.len()
                }
            };
            caret = Some(match caret {
                None => start + inserted,
                Some(offset) => offset - (end - start) + inserted,
            });
        }
        if let Some(offset) = caret {
            self.selection = Selection::Caret(self.position_of_offset(offset));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_selection_between_orders_ends() {
        let sel = Selection::between(pos(2, 1), pos(0, 4));
        assert_eq!(
            sel,
            Selection::Range {
                start: pos(0, 4),
                end: pos(2, 1)
            }
        );
        assert_eq!(sel.caret(), pos(2, 1));
    }

    #[test]
    fn test_selection_between_equal_collapses() {
        let sel = Selection::between(pos(1, 1), pos(1, 1));
        assert_eq!(sel, Selection::Caret(pos(1, 1)));
        assert!(sel.is_caret());
        assert!(sel.range().is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Addressing Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), Some(""));
        assert_eq!(buffer.end_position(), pos(0, 0));
    }

    #[test]
    fn test_lines_and_lengths() {
        let buffer = TextBuffer::from_text("one\ntwo words\n\nfør");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.line(1), Some("two words"));
        assert_eq!(buffer.line(2), Some(""));
        assert_eq!(buffer.line_len(3), Some(3));
        assert_eq!(buffer.line(4), None);
        assert_eq!(buffer.end_position(), pos(3, 3));
    }

    #[test]
    fn test_crlf_line_excludes_carriage_return() {
        let buffer = TextBuffer::from_text("abc\r\ndef");
        assert_eq!(buffer.line(0), Some("abc"));
        assert_eq!(buffer.offset_of(pos(0, 3)).unwrap(), 3);
        assert_eq!(buffer.offset_of(pos(1, 0)).unwrap(), 5);
    }

    #[test]
    fn test_offset_of_multibyte() {
        let buffer = TextBuffer::from_text("Hei på deg\n你好");
        assert_eq!(buffer.offset_of(pos(0, 6)).unwrap(), 7);
        assert_eq!(buffer.offset_of(pos(1, 1)).unwrap(), 15);
    }

    #[test]
    fn test_offset_of_out_of_range() {
        let buffer = TextBuffer::from_text("ab\ncd");
        assert!(matches!(
            buffer.offset_of(pos(0, 3)),
            Err(Error::OutOfRange { line: 0, column: 3 })
        ));
        assert!(matches!(
            buffer.offset_of(pos(2, 0)),
            Err(Error::OutOfRange { line: 2, column: 0 })
        ));
    }

    #[test]
    fn test_char_index_round_trip() {
        let buffer = TextBuffer::from_text("a🎉\nbc");
        assert_eq!(buffer.position_of_char_index(0), pos(0, 0));
        assert_eq!(buffer.position_of_char_index(2), pos(0, 2));
        assert_eq!(buffer.position_of_char_index(3), pos(1, 0));
        assert_eq!(buffer.position_of_char_index(99), pos(1, 2));
        assert_eq!(buffer.char_index_of(pos(1, 1)).unwrap(), 4);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_at_shifts_following_content() {
        let mut buffer = TextBuffer::from_text("hello\nworld");
        buffer.insert_at(pos(1, 0), "big ").unwrap();
        assert_eq!(buffer.full_text(), "hello\nbig world");
    }

    #[test]
    fn test_insert_at_end_of_document() {
        let mut buffer = TextBuffer::from_text("hello");
        buffer.insert_at(pos(0, 5), "!").unwrap();
        assert_eq!(buffer.full_text(), "hello!");
    }

    #[test]
    fn test_insert_out_of_range_leaves_document_unchanged() {
        let mut buffer = TextBuffer::from_text("hello");
        let err = buffer.insert_at(pos(3, 0), "x").unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
        assert_eq!(buffer.full_text(), "hello");
    }

    #[test]
    fn test_replace_range() {
        let mut buffer = TextBuffer::from_text("click here now");
        buffer
            .replace_range(pos(0, 6), pos(0, 10), "[here](https://example.com)")
            .unwrap();
        assert_eq!(buffer.full_text(), "click [here](https://example.com) now");
    }

    #[test]
    fn test_apply_edits_uses_original_coordinates() {
        let mut buffer = TextBuffer::from_text("a\nb\nc");
        buffer
            .apply_edits(&[
                Edit::insert(pos(0, 0), "1. "),
                Edit::insert(pos(1, 0), "2. "),
                Edit::insert(pos(2, 0), "3. "),
            ])
            .unwrap();
        assert_eq!(buffer.full_text(), "1. a\n2. b\n3. c");
    }

    #[test]
    fn test_apply_edits_same_position_keeps_list_order() {
        let mut buffer = TextBuffer::new();
        buffer
            .apply_edits(&[Edit::insert(pos(0, 0), "<"), Edit::insert(pos(0, 0), ">")])
            .unwrap();
        assert_eq!(buffer.full_text(), "<>");
    }

    #[test]
    fn test_apply_edits_is_all_or_nothing() {
        let mut buffer = TextBuffer::from_text("a\nb");
        let result = buffer.apply_edits(&[
            Edit::insert(pos(0, 0), "x"),
            Edit::insert(pos(5, 0), "y"),
        ]);
        assert!(result.is_err());
        assert_eq!(buffer.full_text(), "a\nb");
    }

    #[test]
    fn test_apply_edits_rejects_overlap() {
        let mut buffer = TextBuffer::from_text("abcdef");
        let result = buffer.apply_edits(&[
            Edit::replace(pos(0, 0), pos(0, 4), "x"),
            Edit::replace(pos(0, 2), pos(0, 6), "y"),
        ]);
        assert!(result.is_err());
        assert_eq!(buffer.full_text(), "abcdef");
    }

    #[test]
    fn test_insert_at_moves_caret_past_text() {
        let mut buffer = TextBuffer::from_text("ab");
        buffer.insert_at(pos(0, 1), "x\ny").unwrap();
        assert_eq!(buffer.selection(), Selection::Caret(pos(1, 1)));
    }

    #[test]
    fn test_apply_edits_caret_after_last_edit() {
        let mut buffer = TextBuffer::from_text("hello world");
        buffer
            .set_selection(Selection::between(pos(0, 6), pos(0, 11)))
            .unwrap();
        buffer
            .apply_edits(&[Edit::insert(pos(0, 11), "**"), Edit::insert(pos(0, 6), "**")])
            .unwrap();
        assert_eq!(buffer.full_text(), "hello **world**");
        assert_eq!(buffer.selection(), Selection::Caret(pos(0, 15)));
    }

    #[test]
    fn test_apply_edits_caret_accounts_for_earlier_replacements() {
        let mut buffer = TextBuffer::from_text("one two");
        buffer
            .apply_edits(&[
                Edit::replace(pos(0, 0), pos(0, 3), "1"),
                Edit::insert(pos(0, 7), "!\n"),
            ])
            .unwrap();
        assert_eq!(buffer.full_text(), "1 two!\n");
        assert_eq!(buffer.selection(), Selection::Caret(pos(1, 0)));
    }

    #[test]
    fn test_apply_no_edits_keeps_selection() {
        let mut buffer = TextBuffer::from_text("abc");
        let selection = Selection::between(pos(0, 0), pos(0, 2));
        buffer.set_selection(selection).unwrap();
        buffer.apply_edits(&[]).unwrap();
        assert_eq!(buffer.selection(), selection);
    }

    #[test]
    fn test_set_selection_validates() {
        let mut buffer = TextBuffer::from_text("abc");
        assert!(buffer
            .set_selection(Selection::between(pos(0, 0), pos(0, 9)))
            .is_err());
        assert_eq!(buffer.selection(), Selection::default());
    }

    #[test]
    fn test_set_selection_chars_and_selected_text() {
        let mut buffer = TextBuffer::from_text("one\ntwo");
        buffer.set_selection_chars(6, 2);
        assert_eq!(
            buffer.selection(),
            Selection::Range {
                start: pos(0, 2),
                end: pos(1, 2)
            }
        );
        assert_eq!(buffer.selected_text(), "e\ntw");
    }

    #[test]
    fn test_set_text_resets_caret() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.set_selection(Selection::Caret(pos(0, 3))).unwrap();
        buffer.set_text("new");
        assert_eq!(buffer.selection(), Selection::default());
        assert_eq!(buffer.full_text(), "new");
    }
}
