//! Editor module for Lightmark
//!
//! The document buffer with its selection model, and the egui widget that
//! edits it.

mod buffer;
mod widget;

pub use buffer::{Edit, Position, Selection, TextBuffer};
pub use widget::{EditorOutput, EditorWidget};
