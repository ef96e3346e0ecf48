//! Error type shared by every Lightmark module
//!
//! Document problems (bad edit positions, unreadable files) are reported to
//! the user and leave the document as it was. Render failures never reach
//! this far as panics; they become an `Error::Render` shown in the preview.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Which side of the settings round trip failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    Load,
    Save,
}

impl ConfigAction {
    fn verb(self) -> &'static str {
        match self {
            ConfigAction::Load => "read",
            ConfigAction::Save => "write",
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Io(io::Error),

    /// Opening a document failed (missing file, permissions, invalid UTF-8)
    FileRead { path: PathBuf, source: io::Error },

    FileWrite { path: PathBuf, source: io::Error },

    /// An edit addressed a position past the end of a line or the document
    OutOfRange { line: usize, column: usize },

    /// Link wrapping needs selected text
    EmptySelectionForLink,

    Render(String),

    /// Settings file or directory could not be read or written
    Config {
        action: ConfigAction,
        path: PathBuf,
        source: io::Error,
    },

    /// Settings JSON was malformed or could not be produced
    ConfigFormat(serde_json::Error),

    /// No per-user config directory on this platform
    ConfigDirNotFound,

    Export { path: PathBuf, source: io::Error },

    Clipboard(String),

    Application(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigFormat(err)
    }
}

impl From<arboard::Error> for Error {
    fn from(err: arboard::Error) -> Self {
        Error::Clipboard(err.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Could not open '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Could not save '{}': {}", path.display(), source)
            }
            Error::OutOfRange { line, column } => write!(
                f,
                "Line {}, column {} is outside the document",
                line + 1,
                column + 1
            ),
            Error::EmptySelectionForLink => f.write_str("Select the text to link first"),
            Error::Render(msg) => write!(f, "Markdown rendering failed: {}", msg),
            Error::Config {
                action,
                path,
                source,
            } => write!(
                f,
                "Could not {} settings at '{}': {}",
                action.verb(),
                path.display(),
                source
            ),
            Error::ConfigFormat(err) => write!(f, "Settings file is not valid JSON: {}", err),
            Error::ConfigDirNotFound => f.write_str("No configuration directory available"),
            Error::Export { path, source } => {
                write!(f, "Could not export '{}': {}", path.display(), source)
            }
            Error::Clipboard(msg) => write!(f, "Clipboard unavailable: {}", msg),
            Error::Application(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(source)
            | Error::FileRead { source, .. }
            | Error::FileWrite { source, .. }
            | Error::Config { source, .. }
            | Error::Export { source, .. } => Some(source),
            Error::ConfigFormat(err) => Some(err),
            Error::OutOfRange { .. }
            | Error::EmptySelectionForLink
            | Error::Render(_)
            | Error::ConfigDirNotFound
            | Error::Clipboard(_)
            | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fallbacks
// ─────────────────────────────────────────────────────────────────────────────

pub trait ResultExt<T> {
    /// Log the error with `context` and continue with `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{} ({}), falling back to defaults", context, err);
            default
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
