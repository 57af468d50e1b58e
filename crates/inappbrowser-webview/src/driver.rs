//! Session drivers: engine-specific settings applied once per session.

use tracing::{debug, warn};

use crate::features::{CachePolicy, FeatureFlags};
use crate::view::{BrowserView, CookieStore};

/// Inputs a driver sees when a session's view has just been created.
pub struct DriverContext<'a> {
    pub features: &'a FeatureFlags,
    pub storage_enabled: bool,
    pub cookies: Option<&'a dyn CookieStore>,
}

/// Applies user-configured settings to a freshly created overlay view.
pub trait SessionDriver {
    fn apply_settings(&self, view: &mut dyn BrowserView, ctx: &DriverContext<'_>);
}

/// Honors zoom, storage, and cookie purging where the engine allows it.
#[derive(Debug, Default)]
pub struct DefaultDriver;

impl SessionDriver for DefaultDriver {
    fn apply_settings(&self, view: &mut dyn BrowserView, ctx: &DriverContext<'_>) {
        let caps = view.capabilities();

        if caps.zoom_controls {
            if let Err(e) = view.set_zoom_controls(ctx.features.zoom_controls) {
                warn!(error = %e, "failed to apply zoom setting");
            }
        } else {
            debug!("engine has no zoom controls; skipping");
        }

        if caps.database_storage {
            if let Err(e) = view.set_database_enabled(ctx.storage_enabled) {
                warn!(error = %e, "failed to apply storage setting");
            }
        }

        match (ctx.features.cache, ctx.cookies) {
            (CachePolicy::ClearAll, Some(cookies)) => cookies.remove_all_cookies(),
            (CachePolicy::ClearSession, Some(cookies)) => cookies.remove_session_cookies(),
            (CachePolicy::Keep, _) => {}
            (policy, None) => warn!(?policy, "no cookie store; cannot clear cache"),
        }
    }
}
