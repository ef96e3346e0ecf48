//! UI components for Lightmark

mod dialogs;
mod settings;
mod toolbar;

pub use dialogs::{show_confirm_dialog, show_error_modal, ConfirmResult};
pub use settings::show_settings_menu;
pub use toolbar::{Toolbar, ToolbarAction, ToolbarContext};
