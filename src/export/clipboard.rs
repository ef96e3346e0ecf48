//! Clipboard operations for rendered HTML
//!
//! Uses arboard for cross-platform clipboard access.

use crate::error::Result;
use arboard::Clipboard;
use log::debug;

/// Put rendered HTML on the clipboard, with the markdown source as the
/// plain-text alternative for apps that cannot paste HTML.
pub fn copy_html_to_clipboard(html: &str, markdown: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_html(html, Some(markdown))?;
    debug!("Copied {} bytes of HTML to clipboard", html.len());
    Ok(())
}
