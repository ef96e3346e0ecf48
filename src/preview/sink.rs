//! Preview output targets
//!
//! A [`PreviewSink`] receives the outcome of every render step. The egui
//! implementation, [`PreviewPane`], lays the document out as formatted text
//! and can switch to the generated HTML source.

use eframe::egui::{self, Color32, RichText, ScrollArea, TextEdit};

use crate::markdown::MarkdownOptions;
use crate::preview::view::{parse_blocks, show_blocks, Block};
use crate::string_utils::html_escape;

/// Receives rendered HTML or a render failure.
pub trait PreviewSink {
    /// Show a fresh render of `markdown`.
    fn display(&mut self, html: &str, markdown: &str);

    /// Show a fallback fragment describing a render failure.
    fn display_error(&mut self, message: &str);
}

/// Minimal HTML fragment shown in place of a failed render.
pub fn error_fragment(message: &str) -> String {
    format!("<p>ERR: {}</p>", html_escape(message))
}

// ─────────────────────────────────────────────────────────────────────────────
// egui Preview Pane
// ─────────────────────────────────────────────────────────────────────────────

/// What the preview panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewMode {
    #[default]
    Rendered,
    Html,
}

/// The preview panel of the main window.
#[derive(Debug, Default)]
pub struct PreviewPane {
    options: MarkdownOptions,
    blocks: Vec<Block>,
    html: String,
    error: Option<String>,
    mode: PreviewMode,
}

impl PreviewPane {
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Extensions used for the next rendered layout.
    pub fn set_options(&mut self, options: MarkdownOptions) {
        self.options = options;
    }

    /// The last render failure, cleared by the next successful render.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, font_size: f32) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.mode, PreviewMode::Rendered, "Preview");
            ui.selectable_value(&mut self.mode, PreviewMode::Html, "HTML");
        });
        ui.separator();

        if let Some(message) = &self.error {
            ui.label(
                RichText::new(format!("ERR: {}", message))
                    .color(Color32::from_rgb(220, 50, 47))
                    .strong(),
            );
            ui.separator();
        }

        ScrollArea::vertical()
            .id_source("preview_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| match self.mode {
                PreviewMode::Rendered => show_blocks(ui, &self.blocks, font_size),
                PreviewMode::Html => {
                    let mut html = self.html.as_str();
                    ui.add(
                        TextEdit::multiline(&mut html)
                            .code_editor()
                            .font(egui::FontId::monospace(font_size))
                            .desired_width(f32::INFINITY),
                    );
                }
            });
    }
}

impl PreviewSink for PreviewPane {
    fn display(&mut self, html: &str, markdown: &str) {
        self.html = html.to_string();
        self.blocks = parse_blocks(markdown, &self.options);
        self.error = None;
    }

    fn display_error(&mut self, message: &str) {
        self.html = error_fragment(message);
        self.blocks.clear();
        self.error = Some(message.to_string());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
