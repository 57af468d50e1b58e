//! In-app browser preferences.
//!
//! TOML-based preferences that pick the session driver and navigation
//! handler strategies, plus storage and logging settings. Every section
//! uses serde defaults, so a partial file (or none at all) works.
//!
//! ```rust,no_run
//! use inappbrowser_config::load_default;
//!
//! let prefs = load_default().expect("failed to load preferences");
//! println!("driver = {}", prefs.browser.driver);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BrowserConfig, LogLevel, LoggingConfig, Preferences, DEFAULT_STRATEGY};
pub use toml_loader::{load_default, load_from_path};
