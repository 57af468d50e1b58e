//! Default TOML preferences template with inline documentation comments.

pub(crate) fn default_preferences_toml() -> &'static str {
    r##"# In-app browser preferences
# Only override what you want to change -- missing fields use defaults.

[browser]
# Registered session driver (applies engine settings when a session opens).
driver = "default"
# Registered navigation handler installed in the overlay view.
internal_plugin = "default"
# storage_enabled = true
# application_id = "inappbrowser"

[logging]
# level = "info"         # trace | debug | info | warn | error
"##
}
