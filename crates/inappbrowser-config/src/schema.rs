//! Preference types.

use serde::{Deserialize, Serialize};

/// Name under which the built-in driver and navigation handler register.
pub const DEFAULT_STRATEGY: &str = "default";

/// Root preferences document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub browser: BrowserConfig,
    pub logging: LoggingConfig,
}

/// Overlay browser behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Registered session driver to use (`inAppBrowserDriver`).
    pub driver: String,
    /// Registered navigation handler to install in the overlay view
    /// (`inAppBrowserInternalPlugin`).
    pub internal_plugin: String,
    /// Whether the overlay view may use web storage databases.
    pub storage_enabled: bool,
    /// Sent with `_system` hand-offs so the external browser can reuse a tab.
    pub application_id: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_STRATEGY.into(),
            internal_plugin: DEFAULT_STRATEGY.into(),
            storage_enabled: true,
            application_id: "inappbrowser".into(),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
