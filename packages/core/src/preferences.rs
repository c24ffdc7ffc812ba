//! User preferences management
//!
//! Handles loading/saving user preferences for the editor.
//! Preferences are stored as `preferences.json` in the config directory.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::ConfigError;

const PREF_FILE: &str = "preferences.json";

/// Environment variable overriding the default database location
pub const DB_PATH_ENV: &str = "SWIFTNOTE_DB_PATH";

/// App-wide preferences structure
/// All fields use #[serde(default)] so existing preferences.json files
/// without the new fields will deserialize without error.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppPreferences {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub editor: EditorPreferences,
}

/// Editor behavior preferences
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditorPreferences {
    /// Enables the Cmd/Ctrl+Shift+9 numbered list command (default: true)
    #[serde(default = "default_ordered_lists")]
    pub ordered_lists: bool,

    /// Shortcut modifier convention (default: auto-detect)
    #[serde(default)]
    pub platform: PlatformPreference,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            ordered_lists: default_ordered_lists(),
            platform: PlatformPreference::default(),
        }
    }
}

fn default_ordered_lists() -> bool {
    true
}

/// Which modifier labels and conventions to present
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlatformPreference {
    #[default]
    Auto,
    Mac,
    Other,
}

/// Default config directory: `<platform config dir>/swiftnote`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("swiftnote"))
        .ok_or_else(|| ConfigError::invalid("config directory", "cannot be determined"))
}

/// Load preferences from `config_dir`
///
/// # Returns
/// * `Ok(AppPreferences)` - Loaded preferences or defaults if file doesn't exist
/// * `Err(ConfigError)` - If the file exists but cannot be read or parsed
pub async fn load_preferences(config_dir: &Path) -> Result<AppPreferences, ConfigError> {
    let pref_file = config_dir.join(PREF_FILE);

    if !pref_file.exists() {
        tracing::debug!("No preferences at {}, using defaults", pref_file.display());
        return Ok(AppPreferences::default());
    }

    let contents = fs::read_to_string(&pref_file).await?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save preferences to `config_dir`
///
/// Uses atomic write pattern (write-to-temp, then rename) to prevent
/// corruption on crash or power loss.
pub async fn save_preferences(
    config_dir: &Path,
    prefs: &AppPreferences,
) -> Result<(), ConfigError> {
    fs::create_dir_all(config_dir).await?;

    let pref_file = config_dir.join(PREF_FILE);
    let temp_file = config_dir.join(format!("{}.tmp", PREF_FILE));

    let serialized = serde_json::to_string_pretty(prefs)?;

    // Atomic write: write to temp file, then rename
    fs::write(&temp_file, serialized).await?;
    fs::rename(&temp_file, &pref_file).await?;

    Ok(())
}

/// Get default database path
///
/// Checks `SWIFTNOTE_DB_PATH` first, then falls back to
/// `~/.swiftnote/database/notes.db` on every platform.
pub fn get_default_database_path() -> Result<PathBuf, ConfigError> {
    if let Ok(env_path) = std::env::var(DB_PATH_ENV) {
        tracing::info!("Using database path from {}: {}", DB_PATH_ENV, env_path);
        return Ok(PathBuf::from(env_path));
    }

    let home_dir = dirs::home_dir()
        .ok_or_else(|| ConfigError::invalid("home directory", "cannot be determined"))?;

    Ok(home_dir
        .join(".swiftnote")
        .join("database")
        .join("notes.db"))
}
