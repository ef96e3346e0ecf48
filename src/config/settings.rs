//! User settings and preferences for Lightmark
//!
//! `Settings` holds every user-configurable option, with serde support for
//! JSON persistence. Toolbar URL fields are deliberately not part of it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::markdown::MarkdownOptions;
use crate::preview::DEFAULT_DEBOUNCE_MS;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 700.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All persisted user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Editor and preview font size in points
    pub font_size: f32,
    pub word_wrap: bool,
    /// Quiet period before the preview re-renders
    pub debounce_ms: u64,
    pub window_size: WindowSize,
    /// Fraction of the window width given to the editor
    pub split_ratio: f32,
    /// Most recently opened or saved documents, newest first
    pub recent_files: Vec<PathBuf>,
    pub max_recent_files: usize,
    /// Pass raw HTML in the markdown through to the preview
    pub allow_raw_html: bool,
    /// Open exported HTML files with the system handler
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 14.0,
            word_wrap: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            window_size: WindowSize::default(),
            split_ratio: 0.5,
            recent_files: Vec::new(),
            max_recent_files: 10,
            allow_raw_html: true,
            open_after_export: false,
        }
    }
}

impl Settings {
    /// Move `path` to the front of the recent files list.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Forget a recent file, e.g. one that can no longer be opened.
    pub fn remove_recent_file(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Renderer options derived from these settings.
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions {
            allow_raw_html: self.allow_raw_html,
            ..MarkdownOptions::default()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    pub const MIN_FONT_SIZE: f32 = 8.0;
    pub const MAX_FONT_SIZE: f32 = 72.0;
    pub const MIN_DEBOUNCE_MS: u64 = 50;
    pub const MAX_DEBOUNCE_MS: u64 = 5000;
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    pub const MIN_SPLIT_RATIO: f32 = 0.1;
    pub const MAX_SPLIT_RATIO: f32 = 0.9;

    /// Clamp every value into its valid range.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.debounce_ms = self
            .debounce_ms
            .clamp(Self::MIN_DEBOUNCE_MS, Self::MAX_DEBOUNCE_MS);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        // NaN survives clamp
        if self.split_ratio.is_nan() {
            self.split_ratio = 0.5;
        }
        self.split_ratio = self
            .split_ratio
            .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO);

        self.max_recent_files = self.max_recent_files.clamp(1, 100);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.debounce_ms, 300);
        assert_eq!(settings.debounce_delay(), Duration::from_millis(300));
        assert!(settings.allow_raw_html);
        assert!(settings.recent_files.is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_size, 14.0);
        assert!(settings.word_wrap);
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings {
            font_size: 2.0,
            debounce_ms: 0,
            split_ratio: 3.0,
            window_size: WindowSize {
                width: 10.0,
                height: 50_000.0,
                maximized: false,
            },
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.debounce_ms, Settings::MIN_DEBOUNCE_MS);
        assert_eq!(settings.split_ratio, Settings::MAX_SPLIT_RATIO);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_sanitize_nan_split_ratio() {
        let mut settings = Settings {
            split_ratio: f32::NAN,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.split_ratio, 0.5);
    }

    #[test]
    fn test_sanitize_trims_recent_files() {
        let mut settings = Settings {
            recent_files: (0..5).map(|i| PathBuf::from(format!("{i}.md"))).collect(),
            max_recent_files: 3,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.recent_files.len(), 3);
    }

    #[test]
    fn test_add_recent_file_dedups_and_orders() {
        let mut settings = Settings {
            max_recent_files: 2,
            ..Settings::default()
        };
        settings.add_recent_file(PathBuf::from("a.md"));
        settings.add_recent_file(PathBuf::from("b.md"));
        settings.add_recent_file(PathBuf::from("a.md"));
        assert_eq!(
            settings.recent_files,
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")]
        );

        settings.add_recent_file(PathBuf::from("c.md"));
        assert_eq!(
            settings.recent_files,
            vec![PathBuf::from("c.md"), PathBuf::from("a.md")]
        );
    }

    #[test]
    fn test_remove_recent_file() {
        let mut settings = Settings::default();
        settings.add_recent_file(PathBuf::from("a.md"));
        settings.add_recent_file(PathBuf::from("b.md"));
        settings.remove_recent_file(Path::new("a.md"));
        assert_eq!(settings.recent_files, vec![PathBuf::from("b.md")]);

        settings.remove_recent_file(Path::new("missing.md"));
        assert_eq!(settings.recent_files.len(), 1);
    }

    #[test]
    fn test_markdown_options_follow_raw_html_flag() {
        let settings = Settings {
            allow_raw_html: false,
            ..Settings::default()
        };
        assert!(!settings.markdown_options().allow_raw_html);
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"debounce_ms": 100000}"#).unwrap();
        assert_eq!(settings.debounce_ms, Settings::MAX_DEBOUNCE_MS);
        assert!(Settings::from_json_sanitized("not json").is_err());
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), "\"system\"");
    }
}
