//! The render step shared by debounced and immediate renders

use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};

use crate::error::Error;
use crate::markdown::MarkdownRenderer;
use crate::preview::sink::PreviewSink;

/// What a render step handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Displayed,
    Failed(String),
}

impl RenderOutcome {
    #[cfg(test)]
    pub fn is_displayed(&self) -> bool {
        matches!(self, RenderOutcome::Displayed)
    }
}

/// Render the whole document and hand the result to the sink.
///
/// Exactly one of `display` or `display_error` is called. Renderer errors and
/// renderer panics both end up in `display_error`.
pub fn render_step(
    renderer: &dyn MarkdownRenderer,
    markdown: &str,
    sink: &mut dyn PreviewSink,
) -> RenderOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(markdown)));

    let failure = match result {
        Ok(Ok(html)) => {
            debug!("Rendered {} bytes of markdown", markdown.len());
            sink.display(&html, markdown);
            return RenderOutcome::Displayed;
        }
        Ok(Err(err)) => err,
        Err(payload) => Error::Render(panic_message(payload.as_ref())),
    };

    let message = match failure {
        Error::Render(msg) => msg,
        other => other.to_string(),
    };
    warn!("Preview render failed: {}", message);
    sink.display_error(&message);
    RenderOutcome::Failed(message)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "renderer panicked".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
