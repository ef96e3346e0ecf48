//! Configuration module for Lightmark
//!
//! User preferences, their JSON serialization and persistent storage in the
//! platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
