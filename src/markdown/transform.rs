//! Selection-aware toolbar transformations
//!
//! Every toolbar button maps to a [`ToolbarCommand`]. Planning a command is a
//! pure function of the document and its selection that yields a list of
//! [`Edit`]s in pre-edit coordinates; the session applies the list atomically
//! and then renders the preview.
//!
//! # Supported Modes
//! - **Line prefix**: headings, bullet and numbered lists, blockquote, rule
//! - **Wrap**: bold, italic, underline, strikethrough, inline code
//! - **Block code**: fenced template or fences around the selection
//! - **Snippet**: table template and image reference at the caret
//! - **Link**: wraps a non-empty selection as `[text](url)`
//!
//! # Usage
//! ```ignore
//! use crate::markdown::transform::{plan, ToolbarCommand};
//!
//! let buffer = TextBuffer::from_text("hello");
//! let edits = plan(&ToolbarCommand::Bold, &buffer)?;
//! buffer.apply_edits(&edits)?;
//! assert_eq!(buffer.full_text(), "**hello**");
//! ```

use crate::editor::{Edit, Position, Selection, TextBuffer};
use crate::error::{Error, Result};

/// Placeholder body of an empty fenced code block.
pub const CODE_PLACEHOLDER: &str = "Your code here";

/// Code fence marker.
pub const FENCE: &str = "```";

/// Table template inserted by the table button.
pub const TABLE_TEMPLATE: &str =
    "\n| Column1 | Column2 |\n|---------|---------|\n| Data1   | Data2   |\n";

/// Alt text used for inserted images.
pub const IMAGE_ALT_TEXT: &str = "Alt text";

/// Default contents of the image URL field.
pub const DEFAULT_IMAGE_URL: &str =
    "https://github.com/adam-p/markdown-here/raw/master/src/common/images/icon48.png";

/// Default contents of the link URL field.
pub const DEFAULT_LINK_URL: &str = "https://example.com";

// ─────────────────────────────────────────────────────────────────────────────
// Toolbar Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Text-transforming toolbar commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarCommand {
    /// Heading level 1-5 (`#`..`#####`)
    Heading(u8),
    /// Bold (`**`)
    Bold,
    /// Italic (`*`)
    Italic,
    /// Underline (`__`)
    Underline,
    /// Strikethrough (`~~`)
    Strikethrough,
    /// Inline code (`` ` ``)
    InlineCode,
    /// Fenced code block
    CodeBlock,
    /// Unordered list (`- `)
    BulletList,
    /// Ordered list (`1. `, `2. `, ...)
    NumberedList,
    /// Blockquote (`> `)
    Blockquote,
    /// Horizontal rule (`---`)
    HorizontalRule,
    /// Table template
    Table,
    /// Image reference with the given URL
    Image(String),
    /// Link around the selection with the given URL
    Link(String),
}

impl ToolbarCommand {
    /// Short button label.
    pub fn label(&self) -> String {
        match self {
            Self::Heading(level) => format!("H{}", level),
            Self::Bold => "B".to_string(),
            Self::Italic => "I".to_string(),
            Self::Underline => "U".to_string(),
            Self::Strikethrough => "S".to_string(),
            Self::InlineCode => "Code".to_string(),
            Self::CodeBlock => "BlockCode".to_string(),
            Self::BulletList => "UL".to_string(),
            Self::NumberedList => "OL".to_string(),
            Self::Blockquote => "Quote".to_string(),
            Self::HorizontalRule => "HR".to_string(),
            Self::Table => "Table".to_string(),
            Self::Image(_) => "IMG".to_string(),
            Self::Link(_) => "Link".to_string(),
        }
    }

    /// Tooltip text for the button.
    pub fn tooltip(&self) -> String {
        match self {
            Self::Heading(level) => format!("Heading {}", level),
            Self::Bold => "Bold (Ctrl+B)".to_string(),
            Self::Italic => "Italic (Ctrl+I)".to_string(),
            Self::Underline => "Underline".to_string(),
            Self::Strikethrough => "Strikethrough".to_string(),
            Self::InlineCode => "Inline code".to_string(),
            Self::CodeBlock => "Fenced code block".to_string(),
            Self::BulletList => "Bulleted list".to_string(),
            Self::NumberedList => "Numbered list".to_string(),
            Self::Blockquote => "Blockquote".to_string(),
            Self::HorizontalRule => "Horizontal rule".to_string(),
            Self::Table => "Insert table".to_string(),
            Self::Image(_) => "Insert image from the URL field".to_string(),
            Self::Link(_) => "Link the selection to the URL field (Ctrl+K)".to_string(),
        }
    }

    fn mode(&self) -> TransformMode<'_> {
        match self {
            Self::Heading(level) => {
                TransformMode::LinePrefix(format!("{} ", "#".repeat((*level).clamp(1, 5) as usize)))
            }
            Self::BulletList => TransformMode::LinePrefix("- ".to_string()),
            Self::Blockquote => TransformMode::LinePrefix("> ".to_string()),
            Self::HorizontalRule => TransformMode::LinePrefix("---\n".to_string()),
            Self::NumberedList => TransformMode::NumberedPrefix,
            Self::Bold => TransformMode::Wrap("**"),
            Self::Italic => TransformMode::Wrap("*"),
            Self::Underline => TransformMode::Wrap("__"),
            Self::Strikethrough => TransformMode::Wrap("~~"),
            Self::InlineCode => TransformMode::Wrap("`"),
            Self::CodeBlock => TransformMode::BlockCode,
            Self::Table => TransformMode::Snippet(TABLE_TEMPLATE.to_string()),
            Self::Image(url) => TransformMode::Snippet(format!("![{}]({})", IMAGE_ALT_TEXT, url)),
            Self::Link(url) => TransformMode::LinkWrap(url),
        }
    }
}

/// How a command turns a selection into edits.
#[derive(Debug)]
enum TransformMode<'a> {
    LinePrefix(String),
    NumberedPrefix,
    Wrap(&'static str),
    BlockCode,
    Snippet(String),
    LinkWrap(&'a str),
}

// ─────────────────────────────────────────────────────────────────────────────
// Planning
// ─────────────────────────────────────────────────────────────────────────────

/// Compute the edits for a command against the buffer's current selection.
///
/// Returns `Error::EmptySelectionForLink` when a link is requested without a
/// selection; callers treat that as a silent no-op.
pub fn plan(command: &ToolbarCommand, buffer: &TextBuffer) -> Result<Vec<Edit>> {
    let selection = buffer.selection();
    let edits = match command.mode() {
        TransformMode::LinePrefix(prefix) => prefix_lines(selection, |_| prefix.clone()),
        TransformMode::NumberedPrefix => prefix_lines(selection, |n| format!("{}. ", n)),
        TransformMode::Wrap(marker) => wrap(selection, buffer, marker),
        TransformMode::BlockCode => block_code(selection),
        TransformMode::Snippet(text) => vec![Edit::insert(selection.caret(), text)],
        TransformMode::LinkWrap(url) => link(selection, buffer, url)?,
    };
    Ok(edits)
}

/// Prefix the caret line, or every line touched by the selection.
///
/// `prefix_for` receives the 1-based ordinal of the line within the range.
/// All insertions are at column 0, so none of them shifts another target.
fn prefix_lines(selection: Selection, prefix_for: impl Fn(usize) -> String) -> Vec<Edit> {
    let (first, last) = match selection.range() {
        Some((start, end)) => (start.line, end.line),
        None => {
            let line = selection.caret().line;
            (line, line)
        }
    };
    (first..=last)
        .enumerate()
        .map(|(i, line)| Edit::insert(Position::new(line, 0), prefix_for(i + 1)))
        .collect()
}

/// Surround the selection, or the whole caret line, with a marker.
fn wrap(selection: Selection, buffer: &TextBuffer, marker: &str) -> Vec<Edit> {
    let (start, end) = selection.range().unwrap_or_else(|| {
        let line = selection.caret().line;
        let len = buffer.line_len(line).unwrap_or(0);
        (Position::new(line, 0), Position::new(line, len))
    });
    vec![Edit::insert(start, marker), Edit::insert(end, marker)]
}

/// Fence the selection, or drop a fenced template at the caret.
fn block_code(selection: Selection) -> Vec<Edit> {
    match selection.range() {
        Some((start, end)) => vec![
            Edit::insert(start, format!("{}\n", FENCE)),
            Edit::insert(end, format!("\n{}", FENCE)),
        ],
        None => vec![Edit::insert(
            selection.caret(),
            format!("\n{FENCE}\n{CODE_PLACEHOLDER}\n{FENCE}\n"),
        )],
    }
}

/// Replace a non-empty selection with `[selection](url)`.
fn link(selection: Selection, buffer: &TextBuffer, url: &str) -> Result<Vec<Edit>> {
    let (start, end) = selection.range().ok_or(Error::EmptySelectionForLink)?;
    let text = buffer.selected_text();
    Ok(vec![Edit::replace(start, end, format!("[{}]({})", text, url))])
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

    /// Plan and apply a command, returning the resulting text.
    fn run(text: &str, selection: Selection, command: ToolbarCommand) -> String {
        let mut buffer = TextBuffer::from_text(text);
        buffer.set_selection(selection).unwrap();
        let edits = plan(&command, &buffer).unwrap();
        buffer.apply_edits(&edits).unwrap();
        buffer.full_text().to_string()
    }

    /// Plan and apply a command, returning the caret afterwards.
    fn caret_after(text: &str, selection: Selection, command: ToolbarCommand) -> Selection {
        let mut buffer = TextBuffer::from_text(text);
        buffer.set_selection(selection).unwrap();
        let edits = plan(&command, &buffer).unwrap();
        buffer.apply_edits(&edits).unwrap();
        buffer.selection()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Prefix Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_on_caret_line() {
        let text = run(
            "intro\ntitle\nbody",
            Selection::Caret(pos(1, 3)),
            ToolbarCommand::Heading(2),
        );
        assert_eq!(text, "intro\n## title\nbody");
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=5u8 {
            let text = run("x", Selection::default(), ToolbarCommand::Heading(level));
            assert_eq!(text, format!("{} x", "#".repeat(level as usize)));
        }
    }

    #[test]
    fn test_bullet_list_prefixes_every_selected_line() {
        let text = run(
            "a\nb\nc\nd",
            Selection::between(pos(1, 1), pos(2, 0)),
            ToolbarCommand::BulletList,
        );
        assert_eq!(text, "a\n- b\n- c\nd");
    }

    #[test]
    fn test_numbered_list_numbers_selected_lines() {
        let text = run(
            "first\nsecond\nthird",
            Selection::between(pos(0, 0), pos(2, 5)),
            ToolbarCommand::NumberedList,
        );
        assert_eq!(text, "1. first\n2. second\n3. third");
    }

    #[test]
    fn test_numbered_list_without_selection_uses_one() {
        let text = run(
            "a\nb",
            Selection::Caret(pos(1, 0)),
            ToolbarCommand::NumberedList,
        );
        assert_eq!(text, "a\n1. b");
    }

    #[test]
    fn test_blockquote_prefix() {
        let text = run("quote me", Selection::Caret(pos(0, 8)), ToolbarCommand::Blockquote);
        assert_eq!(text, "> quote me");
    }

    #[test]
    fn test_horizontal_rule_inserts_line_above() {
        let text = run("after", Selection::default(), ToolbarCommand::HorizontalRule);
        assert_eq!(text, "---\nafter");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wrap Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_without_selection_wraps_line() {
        let text = run("hello", Selection::Caret(pos(0, 2)), ToolbarCommand::Bold);
        assert_eq!(text, "**hello**");
    }

    #[test]
    fn test_wrap_caret_line_only() {
        let text = run(
            "one\ntwo\nthree",
            Selection::Caret(pos(1, 0)),
            ToolbarCommand::Strikethrough,
        );
        assert_eq!(text, "one\n~~two~~\nthree");
    }

    #[test]
    fn test_wrap_empty_line() {
        let text = run("", Selection::default(), ToolbarCommand::Underline);
        assert_eq!(text, "____");
    }

    #[test]
    fn test_italic_wraps_exact_selection() {
        let text = run(
            "Hello world",
            Selection::between(pos(0, 6), pos(0, 11)),
            ToolbarCommand::Italic,
        );
        assert_eq!(text, "Hello *world*");
    }

    #[test]
    fn test_inline_code_across_lines() {
        let text = run(
            "ab\ncd",
            Selection::between(pos(0, 1), pos(1, 1)),
            ToolbarCommand::InlineCode,
        );
        assert_eq!(text, "a`b\nc`d");
    }

    #[test]
    fn test_wrap_unicode_selection() {
        let text = run(
            "Hello 你好 World",
            Selection::between(pos(0, 6), pos(0, 8)),
            ToolbarCommand::Bold,
        );
        assert_eq!(text, "Hello **你好** World");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block Code Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_block_code_fences_selection_unchanged() {
        let text = run(
            "x=1",
            Selection::between(pos(0, 0), pos(0, 3)),
            ToolbarCommand::CodeBlock,
        );
        assert_eq!(text, "```\nx=1\n```");
    }

    #[test]
    fn test_block_code_template_at_caret() {
        let text = run("ab", Selection::Caret(pos(0, 1)), ToolbarCommand::CodeBlock);
        assert_eq!(text, "a\n```\nYour code here\n```\nb");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snippet Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_table_inserted_at_caret() {
        let text = run("intro", Selection::Caret(pos(0, 5)), ToolbarCommand::Table);
        assert_eq!(text, format!("intro{}", TABLE_TEMPLATE));
    }

    #[test]
    fn test_image_ignores_selection() {
        let text = run(
            "see: here",
            Selection::between(pos(0, 5), pos(0, 9)),
            ToolbarCommand::Image("pic.png".to_string()),
        );
        // Inserted at the caret (end of the range); the selected text is kept.
        assert_eq!(text, "see: here![Alt text](pic.png)");
    }

    #[test]
    fn test_image_url_inserted_verbatim() {
        let text = run(
            "",
            Selection::default(),
            ToolbarCommand::Image("not a url ]".to_string()),
        );
        assert_eq!(text, "![Alt text](not a url ])");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Link Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_link_wraps_selection() {
        let text = run(
            "Click here",
            Selection::between(pos(0, 6), pos(0, 10)),
            ToolbarCommand::Link("https://example.com".to_string()),
        );
        assert_eq!(text, "Click [here](https://example.com)");
    }

    #[test]
    fn test_link_without_selection_is_rejected() {
        let buffer = TextBuffer::from_text("Click here");
        let result = plan(
            &ToolbarCommand::Link("https://example.com".to_string()),
            &buffer,
        );
        assert!(matches!(result, Err(Error::EmptySelectionForLink)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Caret Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_caret_after_closing_marker() {
        let caret = caret_after("hello", Selection::Caret(pos(0, 2)), ToolbarCommand::Bold);
        assert_eq!(caret, Selection::Caret(pos(0, 9)));

        let caret = caret_after(
            "a word here",
            Selection::between(pos(0, 2), pos(0, 6)),
            ToolbarCommand::InlineCode,
        );
        assert_eq!(caret, Selection::Caret(pos(0, 8)));
    }

    #[test]
    fn test_caret_after_inserted_snippet() {
        let caret = caret_after("intro", Selection::Caret(pos(0, 5)), ToolbarCommand::Table);
        assert_eq!(caret, Selection::Caret(pos(4, 0)));

        let caret = caret_after(
            "x",
            Selection::Caret(pos(0, 1)),
            ToolbarCommand::Image("a.png".to_string()),
        );
        assert_eq!(caret, Selection::Caret(pos(0, 19)));
    }

    #[test]
    fn test_caret_after_link_and_fence() {
        let caret = caret_after(
            "Click here",
            Selection::between(pos(0, 6), pos(0, 10)),
            ToolbarCommand::Link("u".to_string()),
        );
        assert_eq!(caret, Selection::Caret(pos(0, 15)));

        let caret = caret_after(
            "a\nb",
            Selection::between(pos(0, 0), pos(1, 1)),
            ToolbarCommand::CodeBlock,
        );
        assert_eq!(caret, Selection::Caret(pos(3, 3)));
    }

    #[test]
    fn test_caret_after_line_prefix() {
        let caret = caret_after("title", Selection::Caret(pos(0, 3)), ToolbarCommand::Heading(2));
        assert_eq!(caret, Selection::Caret(pos(0, 3)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metadata Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_labels() {
        assert_eq!(ToolbarCommand::Heading(3).label(), "H3");
        assert_eq!(ToolbarCommand::CodeBlock.label(), "BlockCode");
        assert_eq!(ToolbarCommand::Link(String::new()).label(), "Link");
    }

    #[test]
    fn test_tooltips_mention_shortcuts() {
        assert!(ToolbarCommand::Bold.tooltip().contains("Ctrl+B"));
        assert!(ToolbarCommand::Link(String::new()).tooltip().contains("Ctrl+K"));
    }
}
