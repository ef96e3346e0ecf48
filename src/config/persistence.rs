//! Reading and writing `config.json`
//!
//! The file lives in `<platform config dir>/lightmark/`. A missing or blank
//! file means defaults. Any other problem is logged by [`load_config`],
//! which then falls back to defaults as well.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::Settings;
use crate::error::{ConfigAction, Error, Result, ResultExt};

/// Directory name under the platform config dir.
pub const APP_NAME: &str = "lightmark";

const CONFIG_FILE_NAME: &str = "config.json";
const STAGING_FILE_NAME: &str = "config.json.tmp";

fn config_error(action: ConfigAction, path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Config {
        action,
        path: path.to_path_buf(),
        source,
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::ConfigDirNotFound)?;
    Ok(base.join(APP_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Settings from the user's config dir, or defaults if anything goes wrong.
pub fn load_config() -> Settings {
    get_config_dir()
        .and_then(|dir| load_config_from(&dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_warn_default(Settings::default(), "Settings not loaded")
}

/// Parse and sanitize one settings file.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No settings at {}", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(config_error(ConfigAction::Load, path)(e)),
    };

    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).inspect_err(|e| {
        warn!("Ignoring malformed settings in {}: {}", path.display(), e);
    })?;
    info!("Settings loaded from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Write settings into `dir`, creating it on first use.
///
/// The JSON goes to a staging file that is renamed over `config.json`.
pub fn save_config_to(dir: &Path, settings: &Settings) -> Result<()> {
    fs::create_dir_all(dir).map_err(config_error(ConfigAction::Save, dir))?;

    let target = dir.join(CONFIG_FILE_NAME);
    let staging = dir.join(STAGING_FILE_NAME);
    let json = serde_json::to_string_pretty(settings)?;

    fs::write(&staging, json).map_err(config_error(ConfigAction::Save, &staging))?;
    fs::rename(&staging, &target).map_err(config_error(ConfigAction::Save, &target))?;

    info!("Settings saved to {}", target.display());
    Ok(())
}

/// Save to the user's config dir, logging instead of failing.
pub fn save_config_silent(settings: &Settings) -> bool {
    let result = get_config_dir().and_then(|dir| save_config_to(&dir, settings));
    if let Err(e) = &result {
        warn!("Settings not saved: {}", e);
    }
    result.is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
