//! Navigation policy.
//!
//! Every top-level navigation in the overlay view is classified by scheme:
//! web URLs load in place, telephony/mail/map/store URLs are handed off to
//! external applications, and everything else is left to a fallback URL
//! policy, blocking when nobody has an opinion.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::events::{ViewEvent, ViewEventSink};
use crate::intent::{
    handoff, ExternalLauncher, Intent, SCHEME_GEO, SCHEME_JAVASCRIPT, SCHEME_MAILTO,
    SCHEME_MARKET, SCHEME_SMS, SCHEME_TEL,
};

/// What the overlay view should do with a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    AllowInView,
    HandoffExternal,
    Block,
}

impl NavigationOutcome {
    pub fn is_allowed(self) -> bool {
        self == NavigationOutcome::AllowInView
    }
}

/// A URL allow-list. `None` means "no opinion".
pub trait UrlPolicy: Send + Sync {
    fn should_allow_navigation(&self, url: &str) -> Option<bool>;

    fn should_allow_request(&self, url: &str) -> Option<bool> {
        let _ = url;
        None
    }
}

/// The host page's plugin manager.
pub trait PluginManager: UrlPolicy {
    /// Returns true if some plugin will answer the HTTP auth challenge.
    fn on_http_auth_request(&self, host: &str, realm: &str) -> bool;
}

/// Navigation hooks installed in an overlay view.
pub trait NavigationHandler: Send + Sync {
    fn should_allow_navigation(&self, url: &str) -> NavigationOutcome;

    /// Sub-resource loads (images, scripts, XHR).
    fn should_allow_request(&self, url: &str) -> bool;

    /// Whether page script may reach the host's native bridge.
    fn should_allow_bridge_access(&self, url: &str) -> bool {
        let _ = url;
        false
    }

    fn on_http_auth_request(&self, host: &str, realm: &str) -> bool {
        let _ = (host, realm);
        false
    }
}

/// Collaborators handed to a navigation handler factory.
#[derive(Clone)]
pub struct HandlerContext {
    pub launcher: Arc<dyn ExternalLauncher>,
    pub fallback: Option<Arc<dyn UrlPolicy>>,
    pub plugin_manager: Option<Arc<dyn PluginManager>>,
    pub events: ViewEventSink,
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Built-in scheme-based navigation handler.
pub struct DefaultNavigationHandler {
    ctx: HandlerContext,
}

impl DefaultNavigationHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn hand_off(&self, intent: Intent) -> NavigationOutcome {
        // Navigation stays blocked whether or not an app picked it up.
        handoff(self.ctx.launcher.as_ref(), &intent);
        NavigationOutcome::HandoffExternal
    }
}

impl NavigationHandler for DefaultNavigationHandler {
    fn should_allow_navigation(&self, url: &str) -> NavigationOutcome {
        if is_web_url(url) {
            self.ctx.events.push(ViewEvent::PageStarted {
                url: url.to_string(),
            });
            return NavigationOutcome::AllowInView;
        }
        if url.starts_with(SCHEME_TEL) {
            return self.hand_off(Intent::dial(url));
        }
        if url.starts_with(SCHEME_GEO) || url.starts_with(SCHEME_MAILTO) || url.starts_with(SCHEME_MARKET) {
            return self.hand_off(Intent::view(url));
        }
        if url.starts_with(SCHEME_SMS) {
            return self.hand_off(Intent::sms(url));
        }

        match self
            .ctx
            .fallback
            .as_ref()
            .and_then(|policy| policy.should_allow_navigation(url))
        {
            Some(true) => NavigationOutcome::AllowInView,
            _ => {
                debug!(url = %url, "navigation blocked by default policy");
                NavigationOutcome::Block
            }
        }
    }

    fn should_allow_request(&self, url: &str) -> bool {
        is_web_url(url)
            || self
                .ctx
                .fallback
                .as_ref()
                .and_then(|policy| policy.should_allow_request(url))
                .unwrap_or(false)
    }

    fn on_http_auth_request(&self, host: &str, realm: &str) -> bool {
        match &self.ctx.plugin_manager {
            Some(pm) => pm.on_http_auth_request(host, realm),
            None => {
                debug!(host = %host, realm = %realm, "no plugin manager for auth challenge");
                false
            }
        }
    }
}

/// Decision for a `_self` open in the primary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryVerdict {
    Allow,
    Deny,
    /// No collaborator was able to decide.
    Undecided,
}

/// Ask the allow-list, then the plugin manager. The first answer wins.
pub fn primary_verdict(
    url: &str,
    whitelist: Option<&dyn UrlPolicy>,
    plugin_manager: Option<&dyn PluginManager>,
) -> PrimaryVerdict {
    if url.starts_with(SCHEME_JAVASCRIPT) {
        return PrimaryVerdict::Allow;
    }
    let verdict = whitelist
        .and_then(|w| w.should_allow_navigation(url))
        .or_else(|| plugin_manager.and_then(|pm| pm.should_allow_navigation(url)));
    match verdict {
        Some(true) => PrimaryVerdict::Allow,
        Some(false) => PrimaryVerdict::Deny,
        None => {
            if whitelist.is_none() && plugin_manager.is_none() {
                warn!(url = %url, "no URL policy available for primary view");
            }
            PrimaryVerdict::Undecided
        }
    }
}
