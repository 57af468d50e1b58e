//! Preference validation.
//!
//! Collects every problem into a single `ConfigError` instead of stopping
//! at the first one.

use std::sync::LazyLock;

use inappbrowser_common::ConfigError;
use regex::Regex;

use crate::schema::Preferences;

static STRATEGY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap());

fn validate_strategy_name(errors: &mut Vec<String>, name: &str, value: &str) {
    if !STRATEGY_NAME_RE.is_match(value) {
        errors.push(format!(
            "{name} = {value:?} must be a non-empty name of letters, digits, '_', '.' or '-'"
        ));
    }
}

/// Run all validations on the preferences, collecting all errors.
pub fn validate(prefs: &Preferences) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_strategy_name(&mut errors, "browser.driver", &prefs.browser.driver);
    validate_strategy_name(
        &mut errors,
        "browser.internal_plugin",
        &prefs.browser.internal_plugin,
    );
    if prefs.browser.application_id.trim().is_empty() {
        errors.push("browser.application_id must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
