//! Markdown to HTML rendering using comrak
//!
//! The preview pipeline only depends on the [`MarkdownRenderer`] trait so the
//! session can be driven by a different engine (or a failing one in tests).

use comrak::{markdown_to_html, Options};

use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Renderer Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Converts a complete markdown document into an HTML fragment.
///
/// Implementations must be deterministic: the same input yields the same
/// output.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Extensions enabled on top of CommonMark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Generate GitHub-style heading IDs
    pub header_ids: Option<String>,
    /// Pass raw HTML and unsafe URLs through to the output
    pub allow_raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            header_ids: Some(String::new()),
            allow_raw_html: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    pub(crate) fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.header_ids = self.header_ids.clone();

        options.render.unsafe_ = self.allow_raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comrak Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// CommonMark + GFM renderer backed by comrak.
#[derive(Debug, Clone)]
pub struct ComrakRenderer {
    options: MarkdownOptions,
}

impl ComrakRenderer {
    pub fn new(options: &MarkdownOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new(&MarkdownOptions::default())
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        Ok(markdown_to_html(markdown, &self.options.to_comrak_options()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_html(markdown: &str) -> Result<String> {
        ComrakRenderer::default().render(markdown)
    }

    #[test]
    fn test_render_heading() {
        let html = render_to_html("# Title").unwrap();
        assert!(html.contains("<h1>"));
        assert!(html.contains("Title</h1>"));
    }

    #[test]
    fn test_render_emphasis() {
        let html = render_to_html("**a**").unwrap();
        assert_eq!(html.trim(), "<p><strong>a</strong></p>");
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(render_to_html("").unwrap(), "");
    }

    #[test]
    fn test_render_is_deterministic() {
        let markdown = "- a\n- b\n\n| x | y |\n|---|---|\n| 1 | 2 |\n";
        assert_eq!(
            render_to_html(markdown).unwrap(),
            render_to_html(markdown).unwrap()
        );
    }

    #[test]
    fn test_render_gfm_extensions() {
        let html = render_to_html("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_render_fenced_code() {
        let html = render_to_html("```\nx=1\n```").unwrap();
        assert!(html.contains("<pre><code>x=1\n</code></pre>"));
    }

    #[test]
    fn test_raw_html_toggle() {
        let markdown = "<span>raw</span>";

        let allowed = ComrakRenderer::default().render(markdown).unwrap();
        assert!(allowed.contains("<span>raw</span>"));

        let options = MarkdownOptions {
            allow_raw_html: false,
            ..MarkdownOptions::default()
        };
        let filtered = ComrakRenderer::new(&options).render(markdown).unwrap();
        assert!(!filtered.contains("<span>"));
    }

    #[test]
    fn test_render_image_reference() {
        let html = render_to_html("![Alt text](pic.png)").unwrap();
        assert!(html.contains("<img src=\"pic.png\" alt=\"Alt text\""));
    }

    #[test]
    fn test_intraword_underscores_stay_literal() {
        let html = render_to_html("snake_case_name").unwrap();
        assert_eq!(html.trim(), "<p>snake_case_name</p>");
    }

    #[test]
    fn test_cuddled_list_after_paragraph() {
        let html = render_to_html("Items:\n- one\n- two\n").unwrap();
        assert!(html.contains("<p>Items:</p>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_render_footnotes() {
        let html = render_to_html("Note[^1]\n\n[^1]: Detail\n").unwrap();
        assert!(html.contains("footnote"));
        assert!(html.contains("Detail"));
    }
}
