//! Main application module for Lightmark
//!
//! Implements the eframe App trait: toolbar on top, editor on the left,
//! preview on the right, status bar at the bottom. The preview is refreshed
//! by the debounce scheduler, polled once per frame.

use std::path::PathBuf;
use std::time::Instant;

use eframe::egui::{self, Key, Modifiers};
use log::{debug, info, warn};

use crate::config::{Settings, Theme, WindowSize};
use crate::editor::EditorWidget;
use crate::export::{
    copy_html_to_clipboard, ensure_html_extension, generate_html_document, open_in_browser,
    open_with_system, write_html_file,
};
use crate::files::dialogs::{open_markdown_dialog, save_html_dialog, save_markdown_dialog};
use crate::files::display_name;
use crate::markdown::ToolbarCommand;
use crate::preview::PreviewPane;
use crate::state::AppState;
use crate::theme::ThemeManager;
use crate::ui::{
    show_confirm_dialog, show_error_modal, show_settings_menu, ConfirmResult, Toolbar, ToolbarAction,
    ToolbarContext,
};

/// How long status toasts stay visible, in seconds.
const TOAST_DURATION: f64 = 2.5;

/// Keyboard shortcut actions, detected while consuming input and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone)]
enum KeyboardAction {
    Open,
    Save,
    SaveAs,
    Undo,
    Redo,
    Command(ToolbarCommand),
}

/// The Lightmark application.
pub struct LightmarkApp {
    state: AppState,
    preview: PreviewPane,
    theme_manager: ThemeManager,
    toolbar: Toolbar,
    start_time: Instant,
    last_window_size: Option<egui::Vec2>,
}

fn system_dark(theme: Option<eframe::Theme>) -> Option<bool> {
    theme.map(|t| t == eframe::Theme::Dark)
}

impl LightmarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing Lightmark");

        let mut state = AppState::with_settings(settings);
        let mut preview = PreviewPane::new(state.settings.markdown_options());

        let seeded = match std::env::current_dir() {
            Ok(dir) => state.session.seed_from_dir(&dir, &mut preview),
            Err(e) => {
                warn!("Cannot read working directory: {}", e);
                false
            }
        };
        if !seeded {
            state.session.render_now(&mut preview);
        }

        let mut theme_manager = ThemeManager::new(state.settings.theme);
        theme_manager.apply_if_needed(
            &cc.egui_ctx,
            system_dark(cc.integration_info.system_theme),
        );

        Self {
            state,
            preview,
            theme_manager,
            toolbar: Toolbar::new(),
            start_time: Instant::now(),
            last_window_size: None,
        }
    }

    /// Seconds since app start, used for toast expiry.
    fn app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn toast(&mut self, message: impl Into<String>) {
        let now = self.app_time();
        self.state.show_toast(message, now, TOAST_DURATION);
    }

    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(size) = ctx.input(|i| i.viewport().inner_rect.map(|r| r.size())) else {
            return;
        };
        let changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        if changed {
            self.last_window_size = Some(size);
            let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
            self.state.update_settings(|s| {
                s.window_size = WindowSize {
                    width: size.x,
                    height: size.y,
                    maximized,
                }
            });
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyboard Shortcuts
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume shortcut keys before the editor sees them.
    ///
    /// Ctrl+Z/Ctrl+Y must not reach the text widget, which has its own undo.
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let link_url = self.state.ui.link_url.clone();
        let action = ctx.input_mut(|i| {
            let shift_cmd = Modifiers::COMMAND | Modifiers::SHIFT;
            if i.consume_key(shift_cmd, Key::S) {
                return Some(KeyboardAction::SaveAs);
            }
            if i.consume_key(shift_cmd, Key::Z) || i.consume_key(Modifiers::COMMAND, Key::Y) {
                return Some(KeyboardAction::Redo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Z) {
                return Some(KeyboardAction::Undo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::S) {
                return Some(KeyboardAction::Save);
            }
            if i.consume_key(Modifiers::COMMAND, Key::O) {
                return Some(KeyboardAction::Open);
            }
            if i.consume_key(Modifiers::COMMAND, Key::B) {
                return Some(KeyboardAction::Command(ToolbarCommand::Bold));
            }
            if i.consume_key(Modifiers::COMMAND, Key::I) {
                return Some(KeyboardAction::Command(ToolbarCommand::Italic));
            }
            if i.consume_key(Modifiers::COMMAND, Key::K) {
                return Some(KeyboardAction::Command(ToolbarCommand::Link(link_url)));
            }
            None
        });

        if let Some(action) = action {
            debug!("Keyboard shortcut: {:?}", action);
            match action {
                KeyboardAction::Open => self.handle_open_file(),
                KeyboardAction::Save => self.handle_save_file(),
                KeyboardAction::SaveAs => self.handle_save_as_file(),
                KeyboardAction::Undo => self.state.undo(&mut self.preview),
                KeyboardAction::Redo => self.state.redo(&mut self.preview),
                KeyboardAction::Command(command) => {
                    self.state.run_command(&command, &mut self.preview)
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn dialog_dir(&self) -> Option<PathBuf> {
        self.state
            .document()
            .path
            .as_ref()
            .or_else(|| self.state.settings.recent_files.first())
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
    }

    fn handle_open_file(&mut self) {
        let dir = self.dialog_dir();
        if let Some(path) = open_markdown_dialog(dir.as_deref()) {
            if self.state.open_path(&path, &mut self.preview) {
                self.toast(format!("Opened {}", display_name(&path)));
            }
        }
    }

    fn handle_open_recent(&mut self, path: PathBuf) {
        if self.state.open_recent(&path, &mut self.preview) {
            self.toast(format!("Opened {}", display_name(&path)));
        }
    }

    fn handle_save_file(&mut self) {
        match self.state.session.save() {
            Ok(Some(path)) => {
                self.state
                    .update_settings(|s| s.add_recent_file(path.clone()));
                self.toast(format!("Saved {}", display_name(&path)));
            }
            Ok(None) => self.handle_save_as_file(),
            Err(e) => self.state.show_error(e.to_string()),
        }
    }

    fn handle_save_as_file(&mut self) {
        let dir = self.dialog_dir();
        let name = self.state.document().path.as_deref().map(display_name);
        if let Some(path) = save_markdown_dialog(dir.as_deref(), name.as_deref()) {
            if let Some(saved) = self.state.save_to(path) {
                self.toast(format!("Saved {}", display_name(&saved)));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export Handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn document_stem(&self) -> String {
        self.state
            .document()
            .path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Rendered standalone document, or `None` after reporting the error.
    fn standalone_html(&mut self) -> Option<String> {
        match self.state.session.render_html() {
            Ok(body) => Some(generate_html_document(
                &body,
                &self.document_stem(),
                self.theme_manager.export_palette(),
            )),
            Err(e) => {
                self.state.show_error(e.to_string());
                None
            }
        }
    }

    fn handle_export_html(&mut self) {
        let Some(html) = self.standalone_html() else {
            return;
        };
        let default_name = format!("{}.html", self.document_stem());
        let dir = self.dialog_dir();
        let Some(path) = save_html_dialog(dir.as_deref(), &default_name) else {
            return;
        };
        let path = ensure_html_extension(path);

        if let Err(e) = write_html_file(&path, &html) {
            self.state.show_error(e.to_string());
            return;
        }
        self.toast(format!("Exported {}", display_name(&path)));

        if self.state.settings.open_after_export {
            if let Err(e) = open_with_system(&path) {
                self.state.show_error(e.to_string());
            }
        }
    }

    fn handle_open_in_browser(&mut self) {
        if let Some(html) = self.standalone_html() {
            if let Err(e) = open_in_browser(&html) {
                self.state.show_error(e.to_string());
            }
        }
    }

    fn handle_copy_html(&mut self) {
        let result = self
            .state
            .session
            .render_html()
            .and_then(|html| copy_html_to_clipboard(&html, self.state.document().text()));
        match result {
            Ok(()) => self.toast("HTML copied to clipboard"),
            Err(e) => self.state.show_error(e.to_string()),
        }
    }

    fn handle_set_theme(&mut self, theme: Theme) {
        self.theme_manager.set_theme(theme);
        self.state.update_settings(|s| s.theme = theme);
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        debug!("Toolbar action: {:?}", action);
        match action {
            ToolbarAction::Open => self.handle_open_file(),
            ToolbarAction::OpenRecent(path) => self.handle_open_recent(path),
            ToolbarAction::Save => self.handle_save_file(),
            ToolbarAction::SaveAs => self.handle_save_as_file(),
            ToolbarAction::Clear => self.state.request_clear(),
            ToolbarAction::Undo => self.state.undo(&mut self.preview),
            ToolbarAction::Redo => self.state.redo(&mut self.preview),
            ToolbarAction::ExportHtml => self.handle_export_html(),
            ToolbarAction::OpenInBrowser => self.handle_open_in_browser(),
            ToolbarAction::CopyHtml => self.handle_copy_html(),
            ToolbarAction::SetTheme(theme) => self.handle_set_theme(theme),
            ToolbarAction::Command(command) => self.state.run_command(&command, &mut self.preview),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Draw all panels. Returns a toolbar action to run after the frame's
    /// widgets have updated the selection.
    ///
    /// While a modal is open the toolbar and editor take no input.
    fn render_ui(&mut self, ctx: &egui::Context, modal_open: bool) -> Option<ToolbarAction> {
        let toolbar_context = ToolbarContext {
            can_undo: self.state.session.document.can_undo(),
            can_redo: self.state.session.document.can_redo(),
            theme: self.theme_manager.current_theme(),
            recent_files: &self.state.settings.recent_files,
        };

        let mut action = None;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            let ui_state = &mut self.state.ui;
            let toolbar = &mut self.toolbar;
            action = ui
                .add_enabled_ui(!modal_open, |ui| {
                    toolbar.show(
                        ui,
                        toolbar_context,
                        &mut ui_state.image_url,
                        &mut ui_state.link_url,
                    )
                })
                .inner;
            ui.add_space(4.0);
        });

        let mut draft_settings = self.state.settings.clone();
        let mut settings_changed = false;

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let buffer = &self.state.document().buffer;
                let selection = buffer.selection();
                let caret = selection.caret();
                ui.label(format!("Ln {}, Col {}", caret.line + 1, caret.column + 1));
                if !selection.is_caret() {
                    ui.label(format!("({} selected)", buffer.selected_text().chars().count()));
                }
                ui.separator();
                ui.label(format!("{} lines", self.state.document().buffer.line_count()));

                if let Some(toast) = &self.state.ui.toast_message {
                    ui.separator();
                    ui.label(egui::RichText::new(toast).italics());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.menu_button("⚙", |ui| {
                        settings_changed = show_settings_menu(ui, &mut draft_settings);
                    });
                    ui.separator();
                    if self.state.session.render_pending() {
                        ui.weak("Rendering…");
                    } else if self.preview.error().is_some() {
                        ui.colored_label(egui::Color32::from_rgb(220, 50, 47), "Render error");
                    }
                });
            });
        });

        if settings_changed {
            draft_settings.sanitize();
            self.state.update_settings(|s| *s = draft_settings);
            self.preview.set_options(self.state.settings.markdown_options());
            self.state.apply_render_settings(&mut self.preview);
        }

        let screen_width = ctx.screen_rect().width();
        let default_width = screen_width * self.state.settings.split_ratio;
        let font_size = self.state.settings.font_size;
        let word_wrap = self.state.settings.word_wrap;
        let sync_cursor = std::mem::take(&mut self.state.ui.sync_editor_cursor);

        let editor_panel = egui::SidePanel::left("editor_panel")
            .resizable(true)
            .default_width(default_width)
            .width_range((screen_width * Settings::MIN_SPLIT_RATIO)..=(screen_width * Settings::MAX_SPLIT_RATIO))
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal_open, |ui| {
                    EditorWidget::new(&mut self.state.session.document.buffer)
                        .id(egui::Id::new("markdown_editor"))
                        .font_size(font_size)
                        .word_wrap(word_wrap)
                        .sync_cursor(sync_cursor)
                        .request_focus(sync_cursor && !modal_open)
                        .show(ui)
                })
                .inner
            });

        let output = editor_panel.inner;
        if output.changed {
            if let Some(previous) = output.previous_content {
                self.state.session.document.record_edit(previous);
            }
            self.state.session.on_user_edit(Instant::now());
        }

        if screen_width > 0.0 {
            let ratio = editor_panel.response.rect.width() / screen_width;
            if (ratio - self.state.settings.split_ratio).abs() > 0.01 {
                self.state.update_settings(|s| s.split_ratio = ratio);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.preview.show(ui, font_size);
        });

        action
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if self.state.ui.show_confirm_dialog {
            let message = self.state.ui.confirm_dialog_message.clone();
            match show_confirm_dialog(ctx, "Confirm", &message) {
                ConfirmResult::Confirmed => self.state.handle_confirmed_action(&mut self.preview),
                ConfirmResult::Cancelled => self.state.cancel_pending_action(),
                ConfirmResult::None => {}
            }
        }

        if self.state.ui.show_error_modal && show_error_modal(ctx, &self.state.ui.error_message) {
            self.state.dismiss_error();
        }
    }
}

impl eframe::App for LightmarkApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.theme_manager
            .apply_if_needed(ctx, system_dark(frame.info().system_theme));

        let now = self.app_time();
        self.state.update_toast(now);
        if let Some(expires_at) = self.state.ui.toast_expires_at {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64((expires_at - now).max(0.0)));
        }

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.state.window_title()));
        self.update_window_state(ctx);

        let modal_open = self.state.ui.show_confirm_dialog || self.state.ui.show_error_modal;
        if !modal_open {
            self.handle_keyboard_shortcuts(ctx);
        }

        let deferred = self.render_ui(ctx, modal_open);
        if let Some(action) = deferred {
            self.handle_toolbar_action(action);
        }

        let now = Instant::now();
        self.state.session.tick(now, &mut self.preview);
        if let Some(wait) = self.state.session.time_until_render(now) {
            ctx.request_repaint_after(wait);
        }

        self.render_dialogs(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.state.save_settings_if_dirty();
    }
}
