//! Modal dialogs: yes/no confirmation and error reporting

use eframe::egui::{self, Color32, Key, RichText};

/// Outcome of a confirmation dialog for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Still open
    None,
    Confirmed,
    Cancelled,
}

/// Yes/no dialog centered on screen. Escape cancels; Enter confirms only
/// while the "Yes" button has keyboard focus.
pub fn show_confirm_dialog(ctx: &egui::Context, title: &str, message: &str) -> ConfirmResult {
    if ctx.input(|i| i.key_pressed(Key::Escape)) {
        return ConfirmResult::Cancelled;
    }

    let mut result = ConfirmResult::None;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(280.0);
            ui.add_space(4.0);
            ui.label(message);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let yes = egui::Button::new(RichText::new("Yes").color(Color32::WHITE))
                        .fill(Color32::from_rgb(200, 60, 60));
                    let response = ui.add(yes);
                    if response.clicked()
                        || (response.has_focus() && ctx.input(|i| i.key_pressed(Key::Enter)))
                    {
                        result = ConfirmResult::Confirmed;
                    }
                    ui.add_space(8.0);
                    if ui.button("No").clicked() {
                        result = ConfirmResult::Cancelled;
                    }
                });
            });
        });
    result
}

/// Error modal. Returns `true` when dismissed.
pub fn show_error_modal(ctx: &egui::Context, message: &str) -> bool {
    let mut dismissed = ctx.input(|i| i.key_pressed(Key::Escape));
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("⚠").size(24.0));
                ui.label(message);
            });
            ui.separator();
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    dismissed
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Event, Modifiers, RawInput};

    fn key(key: Key) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::NONE,
        }
    }

    /// Run frames with the given events and return the last frame's result.
    fn confirm_after(frames: Vec<Vec<Event>>) -> ConfirmResult {
        let ctx = egui::Context::default();
        let mut result = ConfirmResult::None;
        for events in frames {
            let input = RawInput {
                events,
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                result = show_confirm_dialog(ctx, "Confirm", "Clear the document?");
            });
        }
        result
    }

    #[test]
    fn test_enter_without_focus_does_not_confirm() {
        let result = confirm_after(vec![vec![], vec![key(Key::Enter)]]);
        assert_eq!(result, ConfirmResult::None);
    }

    #[test]
    fn test_escape_cancels() {
        let result = confirm_after(vec![vec![], vec![key(Key::Escape)]]);
        assert_eq!(result, ConfirmResult::Cancelled);
    }

    #[test]
    fn test_idle_dialog_stays_open() {
        assert_eq!(confirm_after(vec![vec![], vec![]]), ConfirmResult::None);
    }

    #[test]
    fn test_error_modal_dismissed_by_escape_only() {
        let ctx = egui::Context::default();
        let mut dismissed = true;
        let _ = ctx.run(RawInput::default(), |ctx| {
            dismissed = show_error_modal(ctx, "Could not open 'a.md'");
        });
        assert!(!dismissed);

        let enter = RawInput {
            events: vec![key(Key::Enter)],
            ..Default::default()
        };
        let _ = ctx.run(enter, |ctx| {
            dismissed = show_error_modal(ctx, "Could not open 'a.md'");
        });
        assert!(!dismissed);

        let escape = RawInput {
            events: vec![key(Key::Escape)],
            ..Default::default()
        };
        let _ = ctx.run(escape, |ctx| {
            dismissed = show_error_modal(ctx, "Could not open 'a.md'");
        });
        assert!(dismissed);
    }
}
