//! Runtime application configuration
//!
//! AppConfig is the single source of truth for what the running process uses.
//! It is derived from AppPreferences at startup, enriched with resolved paths
//! and the editor's timing policy.
//!
//! AppConfig is NOT serialized; it is rebuilt on every launch.
//! For persistent user settings, see preferences.rs.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::editor::Platform;
use crate::preferences::{AppPreferences, PlatformPreference};

/// How long Saved/Error stay visible before returning to Idle
pub const SAVE_STATUS_DISPLAY: Duration = Duration::from_secs(2);

/// Visual lock after the save chord fires
pub const SAVE_SHORTCUT_COOLDOWN: Duration = Duration::from_millis(200);

/// Delay after the last search keystroke
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tab associations older than this many whole days are swept
pub const TAB_RETENTION_DAYS: i64 = 7;

/// Minimum spacing between two stale-tab sweeps
pub const CLEANUP_INTERVAL_DAYS: i64 = 1;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Runtime application configuration, derived from AppPreferences at startup.
/// Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Resolved path to the libsql database file
    pub database_path: PathBuf,

    pub save_status_display: Duration,
    pub save_shortcut_cooldown: Duration,
    pub search_debounce: Duration,
    pub tab_retention: chrono::Duration,
    pub cleanup_interval: chrono::Duration,

    /// Whether Cmd/Ctrl+Shift+9 creates numbered lists
    pub ordered_lists: bool,

    /// Resolved shortcut convention
    pub platform: Platform,
}

impl AppConfig {
    /// Build runtime config from user preferences and resolved paths.
    pub fn from_preferences(prefs: &AppPreferences) -> Result<Self, ConfigError> {
        let database_path = match &prefs.database_path {
            Some(p) => p.clone(),
            None => crate::preferences::get_default_database_path()?,
        };

        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("database_path", "must not be empty"));
        }

        let platform = match prefs.editor.platform {
            PlatformPreference::Auto => Platform::current(),
            PlatformPreference::Mac => Platform::Mac,
            PlatformPreference::Other => Platform::Other,
        };

        Ok(AppConfig {
            database_path,
            ordered_lists: prefs.editor.ordered_lists,
            platform,
            ..Self::with_database_path(PathBuf::new())
        })
    }

    /// Default timing policy with an explicit database path
    pub fn with_database_path(database_path: impl Into<PathBuf>) -> Self {
        AppConfig {
            database_path: database_path.into(),
            save_status_display: SAVE_STATUS_DISPLAY,
            save_shortcut_cooldown: SAVE_SHORTCUT_COOLDOWN,
            search_debounce: SEARCH_DEBOUNCE,
            tab_retention: chrono::Duration::days(TAB_RETENTION_DAYS),
            cleanup_interval: chrono::Duration::days(CLEANUP_INTERVAL_DAYS),
            ordered_lists: true,
            platform: Platform::current(),
        }
    }
}
