//! Core TOML loading: read from path or platform default.

use crate::schema::Preferences;
use crate::validation;
use inappbrowser_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::template::default_preferences_toml;

/// Load preferences from a specific TOML file path.
///
/// Missing fields take their serde defaults. Validation failures are
/// logged and the parsed values are returned as-is.
pub fn load_from_path(path: &Path) -> Result<Preferences, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let prefs: Preferences = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&prefs) {
        warn!("preferences validation warning: {e}; keeping parsed values");
    }

    info!("loaded preferences from {}", path.display());
    Ok(prefs)
}

/// Load preferences from the platform-specific default path.
///
/// On Linux: `~/.config/inappbrowser/config.toml`
///
/// If the file does not exist, writes the commented template and returns defaults.
pub fn load_default() -> Result<Preferences, ConfigError> {
    let path = preferences_path()?;

    match load_from_path(&path) {
        Ok(prefs) => Ok(prefs),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no preferences at {}, creating default", path.display());
            write_template(&path)?;
            Ok(Preferences::default())
        }
        Err(e) => Err(e),
    }
}

/// `<config_dir>/inappbrowser/config.toml`
pub(super) fn preferences_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("inappbrowser").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the commented template to `path`, creating its directory.
pub(super) fn write_template(path: &Path) -> Result<(), ConfigError> {
    let written = match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
    .and_then(|()| std::fs::write(path, default_preferences_toml()));
    written.map_err(|e| {
        ConfigError::ParseError(format!("failed to write {}: {e}", path.display()))
    })?;
    info!("created default preferences at {}", path.display());
    Ok(())
}
