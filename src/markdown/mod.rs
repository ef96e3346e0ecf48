//! Markdown rendering and toolbar transformations
//!
//! Rendering uses comrak, a CommonMark + GFM compatible parser. The
//! transform module turns toolbar commands into document edits.

mod renderer;
pub mod transform;

pub use renderer::{ComrakRenderer, MarkdownOptions, MarkdownRenderer};
pub use transform::{plan, ToolbarCommand, DEFAULT_IMAGE_URL, DEFAULT_LINK_URL};
