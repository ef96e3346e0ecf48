//! Application state management for Lightmark
//!
//! - [`Document`]: the buffer plus its file identity and undo history
//! - [`EditorSession`]: the document wired to the debounce scheduler and the
//!   renderer; every path that changes the text ends here
//! - [`AppState`]: session, settings and UI flags for the egui front end

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::{save_config_silent, Settings};
use crate::editor::{Edit, Selection, TextBuffer};
use crate::error::{Error, Result};
use crate::files::{display_name, ensure_markdown_extension, read_document, write_document};
use crate::markdown::{plan, ComrakRenderer, MarkdownRenderer, ToolbarCommand};
use crate::markdown::{DEFAULT_IMAGE_URL, DEFAULT_LINK_URL};
use crate::preview::{render_step, DebounceScheduler, PreviewSink, RenderOutcome};

/// Maximum number of undo snapshots kept per document.
pub const MAX_UNDO_SIZE: usize = 100;

/// File that seeds the document at startup when present.
pub const STARTUP_FILE: &str = "README.md";

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    text: String,
    selection: Selection,
}

/// The edited document.
#[derive(Debug, Clone)]
pub struct Document {
    pub buffer: TextBuffer,
    /// File path (None for unsaved/new documents)
    pub path: Option<PathBuf>,
    /// Content at the last load or save
    original_content: String,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            path: None,
            original_content: String::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.full_text()
    }

    /// Check if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.buffer.full_text() != self.original_content
    }

    /// Display title: file name (or `Untitled`) with `*` when modified.
    pub fn title(&self) -> String {
        let name = self
            .path
            .as_deref()
            .map(display_name)
            .unwrap_or_else(|| "Untitled".to_string());

        if self.is_modified() {
            format!("{}*", name)
        } else {
            name
        }
    }

    /// Treat the current text as the saved state.
    pub fn mark_saved(&mut self) {
        self.original_content = self.buffer.full_text().to_string();
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.buffer.full_text().to_string(),
            selection: self.buffer.selection(),
        }
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > MAX_UNDO_SIZE {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Record an edit the widget already made, given the text before it.
    pub fn record_edit(&mut self, old_content: String) {
        if old_content != self.buffer.full_text() {
            let selection = self.buffer.selection();
            self.push_undo(Snapshot {
                text: old_content,
                selection,
            });
        }
    }

    /// Apply edits atomically as one undo step.
    pub fn apply_edits(&mut self, edits: &[Edit]) -> Result<()> {
        let before = self.snapshot();
        self.buffer.apply_edits(edits)?;
        if before.text != self.buffer.full_text() {
            self.push_undo(before);
        }
        Ok(())
    }

    /// Replace the whole text as one undo step.
    pub fn replace_all(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.buffer.full_text() {
            let before = self.snapshot();
            self.buffer.set_text(text);
            self.push_undo(before);
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.buffer.set_text(snapshot.text);
        let selection = Selection::between(
            self.buffer.clamp_position(snapshot.selection.start()),
            self.buffer.clamp_position(snapshot.selection.caret()),
        );
        let _ = self.buffer.set_selection(selection);
    }

    /// Returns `true` if undo was performed.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = self.snapshot();
                self.redo_stack.push(current);
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if redo was performed.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = self.snapshot();
                self.undo_stack.push(current);
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Session
// ─────────────────────────────────────────────────────────────────────────────

/// The document plus its preview pipeline.
///
/// User keystrokes go through [`EditorSession::on_user_edit`] and render after
/// the quiet period; everything else renders immediately.
pub struct EditorSession {
    pub document: Document,
    scheduler: DebounceScheduler,
    renderer: Box<dyn MarkdownRenderer>,
}

impl EditorSession {
    pub fn new(renderer: Box<dyn MarkdownRenderer>, debounce: Duration) -> Self {
        Self {
            document: Document::new(),
            scheduler: DebounceScheduler::new(debounce),
            renderer,
        }
    }

    /// Session configured from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Box::new(ComrakRenderer::new(&settings.markdown_options())),
            settings.debounce_delay(),
        )
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn MarkdownRenderer>) {
        self.renderer = renderer;
    }

    pub fn set_debounce_delay(&mut self, delay: Duration) {
        self.scheduler.set_delay(delay);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// The user changed the text in the editor widget.
    pub fn on_user_edit(&mut self, now: Instant) {
        self.scheduler.on_edit(now);
    }

    /// Run the debounced render if its deadline has passed.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn PreviewSink) -> Option<RenderOutcome> {
        if self.scheduler.poll(now) {
            debug!("Debounce elapsed, rendering preview");
            Some(render_step(self.renderer.as_ref(), self.document.text(), sink))
        } else {
            None
        }
    }

    /// Time until the pending render, if one is scheduled.
    pub fn time_until_render(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_fire(now)
    }

    pub fn render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Render synchronously and drop any pending debounced render.
    pub fn render_now(&mut self, sink: &mut dyn PreviewSink) -> RenderOutcome {
        let outcome = render_step(self.renderer.as_ref(), self.document.text(), sink);
        self.scheduler.cancel();
        outcome
    }

    /// Render the document for export or clipboard use.
    pub fn render_html(&self) -> Result<String> {
        self.renderer.render(self.document.text())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a toolbar command and render immediately.
    ///
    /// Returns `Ok(None)` when the command had nothing to act on (a link with
    /// no selection); the document and preview are left alone in that case.
    pub fn apply_command(
        &mut self,
        command: &ToolbarCommand,
        sink: &mut dyn PreviewSink,
    ) -> Result<Option<RenderOutcome>> {
        let edits = match plan(command, &self.document.buffer) {
            Ok(edits) => edits,
            Err(Error::EmptySelectionForLink) => {
                debug!("Link requested without a selection, ignoring");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        self.document.apply_edits(&edits)?;
        debug!("Applied {:?} ({} edits)", command, edits.len());
        Ok(Some(self.render_now(sink)))
    }

    pub fn undo(&mut self, sink: &mut dyn PreviewSink) -> bool {
        let done = self.document.undo();
        if done {
            self.render_now(sink);
        }
        done
    }

    pub fn redo(&mut self, sink: &mut dyn PreviewSink) -> bool {
        let done = self.document.redo();
        if done {
            self.render_now(sink);
        }
        done
    }

    /// Empty the document (undoable) and render.
    pub fn clear(&mut self, sink: &mut dyn PreviewSink) {
        self.document.replace_all(String::new());
        info!("Document cleared");
        self.render_now(sink);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the document with a file's content.
    ///
    /// On failure the document is unchanged.
    pub fn load_file(&mut self, path: &Path, sink: &mut dyn PreviewSink) -> Result<()> {
        let content = read_document(path)?;
        self.document.replace_all(content);
        self.document.path = Some(path.to_path_buf());
        self.document.mark_saved();
        self.render_now(sink);
        Ok(())
    }

    /// Seed the document from `dir/README.md` if it exists.
    ///
    /// The seed is not tied to a path, so the first save asks for one.
    pub fn seed_from_dir(&mut self, dir: &Path, sink: &mut dyn PreviewSink) -> bool {
        let readme = dir.join(STARTUP_FILE);
        if !readme.is_file() {
            return false;
        }
        match read_document(&readme) {
            Ok(content) => {
                self.document.buffer.set_text(content);
                self.document.mark_saved();
                self.render_now(sink);
                info!("Seeded document from {}", readme.display());
                true
            }
            Err(e) => {
                warn!("Ignoring startup file: {}", e);
                false
            }
        }
    }

    /// Save to the current path. Returns `Ok(None)` when there is none.
    pub fn save(&mut self) -> Result<Option<PathBuf>> {
        match self.document.path.clone() {
            Some(path) => self.save_as(path).map(Some),
            None => Ok(None),
        }
    }

    /// Save to `path`, appending `.md` when it has no extension.
    pub fn save_as(&mut self, path: PathBuf) -> Result<PathBuf> {
        let path = ensure_markdown_extension(path);
        write_document(&path, self.document.text())?;
        self.document.path = Some(path.clone());
        self.document.mark_saved();
        Ok(path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Actions that need a yes/no confirmation before running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    ClearDocument,
}

/// UI-related state flags.
#[derive(Debug, Clone)]
pub struct UiState {
    pub show_confirm_dialog: bool,
    pub confirm_dialog_message: String,
    pub pending_action: Option<PendingAction>,
    pub show_error_modal: bool,
    pub error_message: String,
    pub toast_message: Option<String>,
    /// When the toast expires (seconds since app start)
    pub toast_expires_at: Option<f64>,
    /// Image URL field of the toolbar
    pub image_url: String,
    /// Link URL field of the toolbar
    pub link_url: String,
    /// Push the buffer selection into the editor widget next frame
    pub sync_editor_cursor: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_confirm_dialog: false,
            confirm_dialog_message: String::new(),
            pending_action: None,
            show_error_modal: false,
            error_message: String::new(),
            toast_message: None,
            toast_expires_at: None,
            image_url: DEFAULT_IMAGE_URL.to_string(),
            link_url: DEFAULT_LINK_URL.to_string(),
            sync_editor_cursor: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state.
pub struct AppState {
    pub session: EditorSession,
    pub settings: Settings,
    pub ui: UiState,
    settings_dirty: bool,
}

impl AppState {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            session: EditorSession::from_settings(&settings),
            settings,
            ui: UiState::default(),
            settings_dirty: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.session.document
    }

    pub fn window_title(&self) -> String {
        format!("{} - Lightmark", self.session.document.title())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a toolbar command; failures go to the error modal.
    pub fn run_command(&mut self, command: &ToolbarCommand, sink: &mut dyn PreviewSink) {
        match self.session.apply_command(command, sink) {
            Ok(Some(_)) => self.ui.sync_editor_cursor = true,
            Ok(None) => {}
            Err(e) => self.show_error(e.to_string()),
        }
    }

    pub fn open_path(&mut self, path: &Path, sink: &mut dyn PreviewSink) -> bool {
        match self.session.load_file(path, sink) {
            Ok(()) => {
                self.update_settings(|s| s.add_recent_file(path.to_path_buf()));
                self.ui.sync_editor_cursor = true;
                true
            }
            Err(e) => {
                self.show_error(e.to_string());
                false
            }
        }
    }

    /// Open an entry of the recent files list. An entry that fails to open
    /// is dropped from the list.
    pub fn open_recent(&mut self, path: &Path, sink: &mut dyn PreviewSink) -> bool {
        let opened = self.open_path(path, sink);
        if !opened {
            warn!("Removing unreadable recent file {}", path.display());
            self.update_settings(|s| s.remove_recent_file(path));
        }
        opened
    }

    pub fn save_to(&mut self, path: PathBuf) -> Option<PathBuf> {
        match self.session.save_as(path) {
            Ok(saved) => {
                self.update_settings(|s| s.add_recent_file(saved.clone()));
                Some(saved)
            }
            Err(e) => {
                self.show_error(e.to_string());
                None
            }
        }
    }

    pub fn undo(&mut self, sink: &mut dyn PreviewSink) {
        if self.session.undo(sink) {
            self.ui.sync_editor_cursor = true;
        }
    }

    pub fn redo(&mut self, sink: &mut dyn PreviewSink) {
        if self.session.redo(sink) {
            self.ui.sync_editor_cursor = true;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Confirmation
    // ─────────────────────────────────────────────────────────────────────────

    /// Ask before clearing the document.
    pub fn request_clear(&mut self) {
        self.ui.pending_action = Some(PendingAction::ClearDocument);
        self.ui.confirm_dialog_message = "Clear the whole document?".to_string();
        self.ui.show_confirm_dialog = true;
    }

    pub fn handle_confirmed_action(&mut self, sink: &mut dyn PreviewSink) {
        if let Some(action) = self.ui.pending_action.take() {
            match action {
                PendingAction::ClearDocument => {
                    self.session.clear(sink);
                    self.ui.sync_editor_cursor = true;
                }
            }
        }
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
    }

    pub fn cancel_pending_action(&mut self) {
        self.ui.pending_action = None;
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark them as needing a save.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings_dirty = true;
    }

    /// Push renderer and debounce settings into the session, then re-render.
    pub fn apply_render_settings(&mut self, sink: &mut dyn PreviewSink) {
        self.session
            .set_renderer(Box::new(ComrakRenderer::new(&self.settings.markdown_options())));
        self.session.set_debounce_delay(self.settings.debounce_delay());
        self.session.render_now(sink);
        self.settings_dirty = true;
    }

    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty && save_config_silent(&self.settings) {
            self.settings_dirty = false;
            info!("Settings saved");
            return true;
        }
        false
    }

    pub fn shutdown(&mut self) {
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.ui.error_message = message;
        self.ui.show_error_modal = true;
    }

    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }

    /// Show a temporary toast; times are seconds since app start.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Clear the toast once it has expired.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
