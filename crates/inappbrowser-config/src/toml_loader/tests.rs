//! Tests for TOML preference loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_inappbrowser_prefs.toml"));
    assert!(matches!(
        result,
        Err(inappbrowser_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[browser]
internal_plugin = "strict"
storage_enabled = false
"#,
    )
    .unwrap();

    let prefs = load_from_path(&path).unwrap();
    assert_eq!(prefs.browser.internal_plugin, "strict");
    assert!(!prefs.browser.storage_enabled);
    // Defaults preserved
    assert_eq!(prefs.browser.driver, "default");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, inappbrowser_common::ConfigError::ParseError(_)));
}

#[test]
fn load_keeps_values_that_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[browser]\ndriver = \"\"\n").unwrap();

    let prefs = load_from_path(&path).unwrap();
    assert_eq!(prefs.browser.driver, "");
}

#[test]
fn create_and_load_default_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inappbrowser").join("config.toml");

    loader::write_template(&path).unwrap();
    assert!(path.exists());

    let prefs = load_from_path(&path).unwrap();
    assert_eq!(prefs.browser.driver, "default");
    assert!(prefs.browser.storage_enabled);
}

#[test]
fn default_preferences_path_is_reasonable() {
    if let Ok(path) = loader::preferences_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("inappbrowser"));
        assert!(path_str.ends_with("config.toml"));
    }
}
