//! Text editor widget for Lightmark
//!
//! Wraps egui's multiline `TextEdit` around a [`TextBuffer`]. The widget
//! works in character indices; they are converted to line/column positions
//! here and nowhere else.

use eframe::egui::{self, text::CCursor, text::CCursorRange, FontId, ScrollArea, TextEdit, Ui};
use log::debug;

use super::buffer::{Selection, TextBuffer};

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Whether the content was modified by the user this frame.
    pub changed: bool,
    /// Content before the modification, for undo recording.
    pub previous_content: Option<String>,
}

/// A text editor widget over a [`TextBuffer`].
///
/// # Example
///
/// ```ignore
/// let output = EditorWidget::new(&mut buffer)
///     .font_size(settings.font_size)
///     .word_wrap(settings.word_wrap)
///     .show(ui);
/// ```
pub struct EditorWidget<'a> {
    buffer: &'a mut TextBuffer,
    font_size: f32,
    word_wrap: bool,
    id: Option<egui::Id>,
    /// Push the buffer selection into the widget before drawing.
    sync_cursor: bool,
    request_focus: bool,
}

impl<'a> EditorWidget<'a> {
    pub fn new(buffer: &'a mut TextBuffer) -> Self {
        Self {
            buffer,
            font_size: 14.0,
            word_wrap: true,
            id: None,
            sync_cursor: false,
            request_focus: false,
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Overwrite the widget's cursor with the buffer selection.
    ///
    /// Used after programmatic edits (toolbar, undo, load).
    #[must_use]
    pub fn sync_cursor(mut self, sync: bool) -> Self {
        self.sync_cursor = sync;
        self
    }

    #[must_use]
    pub fn request_focus(mut self, focus: bool) -> Self {
        self.request_focus = focus;
        self
    }

    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("editor"));
        let font_size = self.font_size;
        let word_wrap = self.word_wrap;

        if self.sync_cursor {
            let (primary, secondary) = selection_char_indices(self.buffer);
            let mut state = TextEdit::load_state(ui.ctx(), id).unwrap_or_default();
            state
                .cursor
                .set_char_range(Some(CCursorRange::two(CCursor::new(secondary), CCursor::new(primary))));
            state.store(ui.ctx(), id);
        }

        let original_content = self.buffer.full_text().to_string();

        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| {
            let font_id = FontId::monospace(font_size);
            let layout_job = if word_wrap {
                egui::text::LayoutJob::simple(
                    text.to_owned(),
                    font_id,
                    ui.visuals().text_color(),
                    wrap_width,
                )
            } else {
                egui::text::LayoutJob::simple_singleline(
                    text.to_owned(),
                    font_id,
                    ui.visuals().text_color(),
                )
            };
            ui.fonts(|f| f.layout_job(layout_job))
        };

        let text_output = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                TextEdit::multiline(self.buffer.text_mut())
                    .id(id)
                    .frame(false)
                    .font(FontId::monospace(font_size))
                    .desired_width(f32::INFINITY)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        if self.request_focus {
            text_output.response.request_focus();
        }

        let changed = self.buffer.full_text() != original_content;
        if changed {
            debug!("Editor content changed ({} bytes)", self.buffer.full_text().len());
        }

        if let Some(cursor_range) = text_output.cursor_range {
            self.buffer.set_selection_chars(
                cursor_range.primary.ccursor.index,
                cursor_range.secondary.ccursor.index,
            );
        } else if changed {
            // Keep the stored selection inside the new text
            let selection = self.buffer.selection();
            let clamped = Selection::between(
                self.buffer.clamp_position(selection.start()),
                self.buffer.clamp_position(selection.caret()),
            );
            let _ = self.buffer.set_selection(clamped);
        }

        EditorOutput {
            changed,
            previous_content: changed.then_some(original_content),
        }
    }
}

/// (caret, anchor) of the buffer selection as character indices.
fn selection_char_indices(buffer: &TextBuffer) -> (usize, usize) {
    let selection = buffer.selection();
    let caret = buffer.char_index_of(selection.caret()).unwrap_or(0);
    let anchor = buffer.char_index_of(selection.start()).unwrap_or(caret);
    (caret, anchor)
}
