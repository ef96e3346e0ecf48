//! File operations module for Lightmark
//!
//! Native open/save dialogs and whole-document reads and writes.

pub mod dialogs;
mod document;

pub use document::{display_name, ensure_markdown_extension, read_document, write_document};
