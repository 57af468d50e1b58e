use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure to hand a URL off to an external application.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("no activity found to handle {0}")]
    NoHandler(String),

    #[error("launch failed: {0}")]
    LaunchFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("view creation failed: {0}")]
    Creation(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("visibility change failed: {0}")]
    Visibility(String),

    #[error("not supported by this view: {0}")]
    NotSupported(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum IabError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Handoff(#[from] HandoffError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("ui thread is no longer running")]
    UiThreadGone,

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("browser.driver must not be empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: browser.driver must not be empty"
        );
    }

    #[test]
    fn handoff_error_display() {
        let err = HandoffError::NoHandler("tel:5551234".into());
        assert_eq!(err.to_string(), "no activity found to handle tel:5551234");
    }

    #[test]
    fn iab_error_from_handoff() {
        let err: IabError = HandoffError::LaunchFailed("denied".into()).into();
        assert!(matches!(err, IabError::Handoff(_)));
        assert_eq!(err.to_string(), "launch failed: denied");
    }

    #[test]
    fn iab_error_from_view() {
        let err: IabError = ViewError::NotSupported("forward navigation").into();
        assert!(matches!(err, IabError::View(_)));
        assert!(err.to_string().contains("forward navigation"));
    }

    #[test]
    fn view_error_display() {
        let err: IabError = ViewError::Visibility("window gone".into()).into();
        assert_eq!(err.to_string(), "visibility change failed: window gone");
    }

    #[test]
    fn iab_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: IabError = json_err.into();
        assert!(matches!(err, IabError::Json(_)));
    }

    #[test]
    fn iab_error_other_variants() {
        let err = IabError::InvalidArgument("missing url".into());
        assert_eq!(err.to_string(), "invalid argument: missing url");

        let err = IabError::UiThreadGone;
        assert_eq!(err.to_string(), "ui thread is no longer running");
    }
}
