//! Theme Manager for Lightmark
//!
//! Resolves the configured [`Theme`] to egui visuals and applies them only
//! when something changed.
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = ThemeManager::new(Theme::System);
//! // once per frame
//! manager.apply_if_needed(ctx, frame.info().system_theme.map(|t| t == eframe::Theme::Dark));
//! ```

use eframe::egui::{Color32, Context, Rounding, Visuals};
use log::{debug, info};

use crate::config::Theme;
use crate::export::ExportPalette;

#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    /// Dark mode actually applied last, `None` before the first apply
    applied_dark: Option<bool>,
    needs_apply: bool,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            applied_dark: None,
            needs_apply: true,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Set the theme; it takes effect on the next `apply_if_needed`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    /// Whether the effective theme is dark.
    ///
    /// `system_dark` is the platform preference, if the platform reports one.
    pub fn resolve_dark(&self, system_dark: Option<bool>) -> bool {
        match self.current_theme {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_dark.unwrap_or(false),
        }
    }

    /// Apply visuals when the theme or the system preference changed.
    ///
    /// Returns `true` if visuals were applied.
    pub fn apply_if_needed(&mut self, ctx: &Context, system_dark: Option<bool>) -> bool {
        let dark = self.resolve_dark(system_dark);
        if !self.needs_apply && self.applied_dark == Some(dark) {
            return false;
        }

        ctx.set_visuals(create_visuals(dark));
        self.applied_dark = Some(dark);
        self.needs_apply = false;
        debug!("Applied theme {:?} (dark: {})", self.current_theme, dark);
        true
    }

    /// Palette for HTML exports matching what is on screen.
    pub fn export_palette(&self) -> ExportPalette {
        if self.applied_dark.unwrap_or(false) {
            ExportPalette::Dark
        } else {
            ExportPalette::Light
        }
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

/// egui visuals for the light or dark variant.
fn create_visuals(dark: bool) -> Visuals {
    let mut visuals = if dark {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    visuals.window_rounding = Rounding::same(6.0);
    visuals.hyperlink_color = if dark {
        Color32::from_rgb(68, 147, 248)
    } else {
        Color32::from_rgb(9, 105, 218)
    };
    visuals
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
