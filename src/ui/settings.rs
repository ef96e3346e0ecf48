//! Settings menu for Lightmark
//!
//! Edits the settings in place; the caller persists and applies them.

use eframe::egui::{self, RichText, Ui};

use crate::config::Settings;

/// Upper bound offered in the menu; longer delays are still accepted from
/// the config file.
const MENU_MAX_DEBOUNCE_MS: u64 = 2000;

/// Returns true if any setting was changed.
pub fn show_settings_menu(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;
    ui.set_min_width(220.0);

    ui.label(RichText::new("Editor").strong());
    ui.horizontal(|ui| {
        ui.label("Font Size");
        changed |= ui
            .add(
                egui::Slider::new(
                    &mut settings.font_size,
                    Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
                )
                .step_by(1.0),
            )
            .changed();
    });
    changed |= ui
        .checkbox(&mut settings.word_wrap, "Word Wrap")
        .on_hover_text("Wrap long lines instead of horizontal scrolling")
        .changed();

    ui.separator();
    ui.label(RichText::new("Preview").strong());
    ui.horizontal(|ui| {
        ui.label("Delay");
        let max = MENU_MAX_DEBOUNCE_MS.max(settings.debounce_ms);
        changed |= ui
            .add(egui::Slider::new(&mut settings.debounce_ms, Settings::MIN_DEBOUNCE_MS..=max).suffix(" ms"))
            .on_hover_text("Idle time after typing before the preview refreshes")
            .changed();
    });
    changed |= ui
        .checkbox(&mut settings.allow_raw_html, "Allow raw HTML")
        .on_hover_text("Pass inline HTML in the document through to the preview")
        .changed();

    ui.separator();
    ui.label(RichText::new("Export").strong());
    changed |= ui
        .checkbox(&mut settings.open_after_export, "Open after export")
        .changed();

    changed
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_menu_without_input_changes_nothing() {
        let ctx = egui::Context::default();
        let mut settings = Settings::default();
        let mut changed = true;

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                changed = show_settings_menu(ui, &mut settings);
            });
        });

        assert!(!changed);
        assert_eq!(settings, Settings::default());
    }
}
