//! Theme system for Lightmark
//!
//! Light, dark and follow-system visuals for the egui UI.

mod manager;

pub use manager::ThemeManager;
