//! Standalone HTML documents
//!
//! Wraps a rendered fragment in a complete document with inlined CSS, writes
//! it to disk and optionally hands it to the system browser.

use crate::error::{Error, Result};
use crate::string_utils::html_escape;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// File name used for "Open in browser" previews in the temp directory.
const BROWSER_PREVIEW_FILE: &str = "lightmark-preview.html";

/// Color palette of an exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPalette {
    #[default]
    Light,
    Dark,
}

impl ExportPalette {
    fn css(&self) -> &'static str {
        match self {
            ExportPalette::Light => LIGHT_CSS,
            ExportPalette::Dark => DARK_CSS,
        }
    }
}

/// Build a complete HTML document around a rendered body.
pub fn generate_html_document(body_html: &str, title: &str, palette: ExportPalette) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Lightmark">
    <title>{title}</title>
    <style>
{base_css}
{palette_css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>
"#,
        title = html_escape(title),
        base_css = BASE_CSS,
        palette_css = palette.css(),
        body = body_html,
    )
}

/// Write an HTML document to `path`.
pub fn write_html_file(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported HTML to {}", path.display());
    Ok(())
}

/// Open a file with the platform's default handler.
pub fn open_with_system(path: &Path) -> Result<()> {
    open::that(path).map_err(|e| {
        warn!("Failed to open {}: {}", path.display(), e);
        Error::Application(format!("Could not open '{}': {}", path.display(), e))
    })
}

/// Write the document to a temp file and open it in the browser.
pub fn open_in_browser(html: &str) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(BROWSER_PREVIEW_FILE);
    write_html_file(&path, html)?;
    open_with_system(&path)?;
    Ok(path)
}

/// Ensure an export path ends in `.html`.
pub fn ensure_html_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("html")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

const BASE_CSS: &str = r#"
*, *::before, *::after { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}
.markdown-body { max-width: 860px; margin: 0 auto; padding: 32px 24px; }
.markdown-body h1, .markdown-body h2, .markdown-body h3,
.markdown-body h4, .markdown-body h5 { margin: 24px 0 16px; line-height: 1.25; }
.markdown-body h1, .markdown-body h2 { padding-bottom: 0.3em; border-bottom: 1px solid; }
.markdown-body p, .markdown-body ul, .markdown-body ol,
.markdown-body pre, .markdown-body table { margin: 0 0 16px; }
.markdown-body ul, .markdown-body ol { padding-left: 2em; }
.markdown-body blockquote { margin: 0 0 16px; padding: 0 1em; border-left: 4px solid; }
.markdown-body code { font-family: 'Consolas', 'Monaco', monospace; font-size: 0.9em; padding: 0.2em 0.4em; border-radius: 4px; }
.markdown-body pre { padding: 16px; overflow: auto; border-radius: 6px; }
.markdown-body pre code { padding: 0; background: transparent; }
.markdown-body table { border-collapse: collapse; }
.markdown-body th, .markdown-body td { padding: 6px 12px; border: 1px solid; }
.markdown-body hr { height: 2px; margin: 24px 0; border: none; }
.markdown-body img { max-width: 100%; }
"#;

const LIGHT_CSS: &str = r#"
body { background: #ffffff; color: #1f2328; }
.markdown-body h1, .markdown-body h2, .markdown-body th, .markdown-body td { border-color: #d0d7de; }
.markdown-body a { color: #0969da; }
.markdown-body blockquote { color: #59636e; border-color: #d0d7de; }
.markdown-body code, .markdown-body pre { background: #f6f8fa; }
.markdown-body hr { background: #d0d7de; }
"#;

const DARK_CSS: &str = r#"
body { background: #0d1117; color: #e6edf3; }
.markdown-body h1, .markdown-body h2, .markdown-body th, .markdown-body td { border-color: #30363d; }
.markdown-body a { color: #4493f8; }
.markdown-body blockquote { color: #9198a1; border-color: #30363d; }
.markdown-body code, .markdown-body pre { background: #161b22; }
.markdown-body hr { background: #30363d; }
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_html_document() {
        let html = generate_html_document("<h1>Hi</h1>", "notes", ExportPalette::Light);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>notes</title>"));
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("#ffffff"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = generate_html_document("", "<b>&", ExportPalette::Dark);
        assert!(html.contains("<title>&lt;b&gt;&amp;</title>"));
        assert!(html.contains("#0d1117"));
    }

    #[test]
    fn test_write_html_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.html");
        write_html_file(&path, "<p>x</p>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>x</p>");
    }

    #[test]
    fn test_write_html_file_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing/out.html");
        assert!(matches!(
            write_html_file(&path, "x"),
            Err(Error::Export { .. })
        ));
    }

    #[test]
    fn test_ensure_html_extension() {
        assert_eq!(
            ensure_html_extension(PathBuf::from("doc")),
            PathBuf::from("doc.html")
        );
        assert_eq!(
            ensure_html_extension(PathBuf::from("doc.htm")),
            PathBuf::from("doc.htm")
        );
    }
}
