//! Toolbar for Lightmark
//!
//! Two rows: file and edit actions on top, markdown formatting below with the
//! image and link URL fields. Returns at most one action per frame.

use std::path::PathBuf;

use eframe::egui::{self, Color32, Response, RichText, TextEdit, Ui, Vec2};

use crate::config::Theme;
use crate::files::display_name;
use crate::markdown::ToolbarCommand;

const BUTTON_MIN_SIZE: Vec2 = Vec2::new(28.0, 24.0);
const URL_FIELD_WIDTH: f32 = 220.0;

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    Open,
    /// Reopen an entry of the recent files list
    OpenRecent(PathBuf),
    Save,
    SaveAs,
    /// Clear the document (asks for confirmation)
    Clear,
    Undo,
    Redo,
    ExportHtml,
    OpenInBrowser,
    CopyHtml,
    SetTheme(Theme),
    /// Transform the document
    Command(ToolbarCommand),
}

/// Enabled state of the context-dependent buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolbarContext<'a> {
    pub can_undo: bool,
    pub can_redo: bool,
    pub theme: Theme,
    /// Newest first
    pub recent_files: &'a [PathBuf],
}

/// Commands that take no URL, in button order.
fn plain_commands() -> Vec<ToolbarCommand> {
    let mut commands: Vec<ToolbarCommand> = (1..=5).map(ToolbarCommand::Heading).collect();
    commands.extend([
        ToolbarCommand::Bold,
        ToolbarCommand::Italic,
        ToolbarCommand::Underline,
        ToolbarCommand::Strikethrough,
        ToolbarCommand::InlineCode,
        ToolbarCommand::CodeBlock,
        ToolbarCommand::BulletList,
        ToolbarCommand::NumberedList,
        ToolbarCommand::Blockquote,
        ToolbarCommand::HorizontalRule,
        ToolbarCommand::Table,
    ]);
    commands
}

/// Toolbar widget.
#[derive(Debug, Clone, Default)]
pub struct Toolbar;

impl Toolbar {
    pub fn new() -> Self {
        Self
    }

    /// Draw the toolbar; the URL fields are edited in place.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        context: ToolbarContext<'_>,
        image_url: &mut String,
        link_url: &mut String,
    ) -> Option<ToolbarAction> {
        let mut action = None;
        let separator_color = ui.visuals().widgets.noninteractive.bg_stroke.color;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;

            if tool_button(ui, "📂 Open", "Open File (Ctrl+O)", true).clicked() {
                action = Some(ToolbarAction::Open);
            }
            ui.add_enabled_ui(!context.recent_files.is_empty(), |ui| {
                ui.menu_button("🕘", |ui| {
                    if let Some(path) = recent_menu(ui, context.recent_files) {
                        action = Some(ToolbarAction::OpenRecent(path));
                        ui.close_menu();
                    }
                })
                .response
                .on_hover_text("Open Recent");
            });
            if tool_button(ui, "💾 Save", "Save (Ctrl+S)", true).clicked() {
                action = Some(ToolbarAction::Save);
            }
            if tool_button(ui, "Save As", "Save As (Ctrl+Shift+S)", true).clicked() {
                action = Some(ToolbarAction::SaveAs);
            }
            if tool_button(ui, "🗑 Clear", "Clear the document", true).clicked() {
                action = Some(ToolbarAction::Clear);
            }

            vertical_separator(ui, separator_color);

            if tool_button(ui, "↩", "Undo (Ctrl+Z)", context.can_undo).clicked() {
                action = Some(ToolbarAction::Undo);
            }
            if tool_button(ui, "↪", "Redo (Ctrl+Y)", context.can_redo).clicked() {
                action = Some(ToolbarAction::Redo);
            }

            vertical_separator(ui, separator_color);

            if tool_button(ui, "Export HTML", "Save as a standalone HTML file", true).clicked() {
                action = Some(ToolbarAction::ExportHtml);
            }
            if tool_button(ui, "🌐", "Open the preview in the browser", true).clicked() {
                action = Some(ToolbarAction::OpenInBrowser);
            }
            if tool_button(ui, "📋", "Copy rendered HTML", true).clicked() {
                action = Some(ToolbarAction::CopyHtml);
            }

            vertical_separator(ui, separator_color);

            let mut theme = context.theme;
            egui::ComboBox::from_id_source("theme_selector")
                .selected_text(theme.label())
                .width(80.0)
                .show_ui(ui, |ui| {
                    for option in Theme::all() {
                        ui.selectable_value(&mut theme, *option, option.label());
                    }
                });
            if theme != context.theme {
                action = Some(ToolbarAction::SetTheme(theme));
            }
        });

        ui.add_space(2.0);

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;

            for command in plain_commands() {
                let label = command_label(&command);
                if ui
                    .add(egui::Button::new(label).min_size(BUTTON_MIN_SIZE))
                    .on_hover_text(command.tooltip())
                    .clicked()
                {
                    action = Some(ToolbarAction::Command(command));
                }
            }

            vertical_separator(ui, separator_color);

            let image = ToolbarCommand::Image(image_url.clone());
            if ui
                .add(egui::Button::new(image.label()).min_size(BUTTON_MIN_SIZE))
                .on_hover_text(image.tooltip())
                .clicked()
            {
                action = Some(ToolbarAction::Command(image));
            }
            url_field(ui, image_url, "Image URL");

            let link = ToolbarCommand::Link(link_url.clone());
            if ui
                .add(egui::Button::new(link.label()).min_size(BUTTON_MIN_SIZE))
                .on_hover_text(link.tooltip())
                .clicked()
            {
                action = Some(ToolbarAction::Command(link));
            }
            url_field(ui, link_url, "Link URL");
        });

        action
    }
}

/// One entry per recent file; returns the clicked path.
fn recent_menu(ui: &mut Ui, recent_files: &[PathBuf]) -> Option<PathBuf> {
    let mut picked = None;
    for path in recent_files {
        if ui
            .button(display_name(path))
            .on_hover_text(path.display().to_string())
            .clicked()
        {
            picked = Some(path.clone());
        }
    }
    picked
}

/// Button text styled like the markup it produces.
fn command_label(command: &ToolbarCommand) -> RichText {
    let text = RichText::new(command.label());
    match command {
        ToolbarCommand::Bold => text.strong(),
        ToolbarCommand::Italic => text.italics(),
        ToolbarCommand::Underline => text.underline(),
        ToolbarCommand::Strikethrough => text.strikethrough(),
        ToolbarCommand::InlineCode | ToolbarCommand::CodeBlock => text.monospace(),
        _ => text,
    }
}

fn tool_button(ui: &mut Ui, text: &str, tooltip: &str, enabled: bool) -> Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(text).min_size(BUTTON_MIN_SIZE),
    )
    .on_hover_text(tooltip)
}

fn url_field(ui: &mut Ui, value: &mut String, hint: &str) {
    ui.add(
        TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(URL_FIELD_WIDTH),
    );
}

fn vertical_separator(ui: &mut Ui, color: Color32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, 20.0), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_commands_cover_all_headings() {
        let commands = plain_commands();
        for level in 1..=5u8 {
            assert!(commands.contains(&ToolbarCommand::Heading(level)));
        }
        assert!(commands.contains(&ToolbarCommand::Table));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, ToolbarCommand::Image(_) | ToolbarCommand::Link(_))));
    }

    #[test]
    fn test_toolbar_context_default() {
        let context = ToolbarContext::default();
        assert!(!context.can_undo);
        assert_eq!(context.theme, Theme::Light);
        assert!(context.recent_files.is_empty());
    }

    #[test]
    fn test_idle_frame_produces_no_action() {
        let recent = vec![PathBuf::from("/notes/todo.md")];
        let context = ToolbarContext {
            recent_files: &recent,
            ..ToolbarContext::default()
        };
        let mut toolbar = Toolbar::new();
        let mut image_url = String::new();
        let mut link_url = String::new();
        let mut action = None;

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = toolbar.show(ui, context, &mut image_url, &mut link_url);
                assert_eq!(recent_menu(ui, &recent), None);
            });
        });
        assert_eq!(action, None);
    }
}
