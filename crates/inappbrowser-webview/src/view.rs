//! View abstractions the coordinator drives.
//!
//! Engines differ in what they can do (zoom controls, forward history,
//! asynchronous evaluation). Rather than probing for methods at runtime,
//! each view reports a [`ViewCapabilities`] set and the coordinator only
//! calls what is advertised.

use std::sync::Arc;

use inappbrowser_common::{SessionId, ViewError};

use crate::events::ViewEventSink;
use crate::policy::NavigationHandler;

/// What an overlay view engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewCapabilities {
    pub zoom_controls: bool,
    pub forward_navigation: bool,
    /// Scripts can be evaluated without navigating to a `javascript:` URL.
    pub async_evaluation: bool,
    pub database_storage: bool,
}

impl ViewCapabilities {
    pub const ALL: Self = Self {
        zoom_controls: true,
        forward_navigation: true,
        async_evaluation: true,
        database_storage: true,
    };
}

/// The secondary web view shown as an overlay.
///
/// Views live on the UI thread and are never shared across threads.
pub trait BrowserView {
    fn capabilities(&self) -> ViewCapabilities;

    fn load_url(&mut self, url: &str) -> Result<(), ViewError>;

    /// Evaluate script without waiting for a result.
    fn evaluate_script(&mut self, script: &str) -> Result<(), ViewError>;

    fn present(&mut self) -> Result<(), ViewError>;

    fn hide(&mut self) -> Result<(), ViewError>;

    fn can_go_back(&self) -> bool;

    fn go_back(&mut self) -> Result<(), ViewError>;

    fn can_go_forward(&self) -> bool {
        false
    }

    fn go_forward(&mut self) -> Result<(), ViewError> {
        Err(ViewError::NotSupported("forward navigation"))
    }

    fn set_zoom_controls(&mut self, enabled: bool) -> Result<(), ViewError> {
        let _ = enabled;
        Err(ViewError::NotSupported("zoom controls"))
    }

    fn set_database_enabled(&mut self, enabled: bool) -> Result<(), ViewError> {
        let _ = enabled;
        Err(ViewError::NotSupported("database storage"))
    }

    /// Release the engine. Called exactly once, when the session closes.
    fn destroy(&mut self);
}

/// Everything a factory needs to build an overlay view.
pub struct ViewRequest {
    pub session: SessionId,
    /// Shown in the location bar before the first load starts.
    pub url: String,
    pub show_location_bar: bool,
    pub handler: Arc<dyn NavigationHandler>,
    pub events: ViewEventSink,
}

/// Creates overlay views. The view must not load anything yet.
pub trait ViewFactory {
    fn create(&self, request: ViewRequest) -> Result<Box<dyn BrowserView>, ViewError>;
}

/// The host application's main web view.
pub trait PrimaryView {
    fn load_url(&mut self, url: &str) -> Result<(), ViewError>;
}

/// Cookie jar shared by the overlay engine.
pub trait CookieStore: Send + Sync {
    fn remove_all_cookies(&self);
    fn remove_session_cookies(&self);
}
