//! Native file dialog integration using the rfd crate

use rfd::FileDialog;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Default file name offered by Save As for a new document.
pub const DEFAULT_DOCUMENT_NAME: &str = "untitled.md";

/// Pick a markdown file to open.
///
/// Returns `None` if the dialog was cancelled.
pub fn open_markdown_dialog(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Open Markdown File")
        .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

/// Pick a location to save the document.
pub fn save_markdown_dialog(initial_dir: Option<&Path>, default_name: Option<&str>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Save Markdown File")
        .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog = dialog.set_file_name(default_name.unwrap_or(DEFAULT_DOCUMENT_NAME));

    dialog.save_file()
}

/// Pick a location for an HTML export.
pub fn save_html_dialog(initial_dir: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Export as HTML")
        .add_filter("HTML Files", HTML_EXTENSIONS)
        .set_file_name(default_name);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}
