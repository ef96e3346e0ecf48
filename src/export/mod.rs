//! Document export for Lightmark
//!
//! - **HTML file**: complete document with inlined CSS
//! - **Browser preview**: the same document in a temp file, opened externally
//! - **Clipboard**: rendered HTML for pasting into other apps

pub mod clipboard;
pub mod html;

pub use clipboard::copy_html_to_clipboard;
pub use html::{
    ensure_html_extension, generate_html_document, open_in_browser, open_with_system,
    write_html_file, ExportPalette,
};
