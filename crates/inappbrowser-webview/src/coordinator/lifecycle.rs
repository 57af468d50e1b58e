//! Bridge commands: open, close, show, inject.

use inappbrowser_common::{CallbackContext, PluginResult, SessionId};
use tracing::{debug, info, warn};

use super::Coordinator;
use crate::dispatcher::{Command, Target};
use crate::driver::DriverContext;
use crate::events::ViewEventSink;
use crate::features::FeatureFlags;
use crate::inject::{wrap_source, InjectKind};
use crate::intent::{handoff, Intent, SCHEME_TEL};
use crate::policy::{primary_verdict, HandlerContext, PrimaryVerdict};
use crate::session::Session;
use crate::view::ViewRequest;

// =============================================================================
// COMMANDS
// =============================================================================

impl Coordinator {
    pub(super) fn apply(&mut self, command: Command, callback: CallbackContext) {
        match command {
            Command::Open {
                url,
                target,
                features,
            } => self.open(&url, target, &features, callback),
            Command::Close => self.close(),
            Command::Inject {
                kind,
                source,
                wants_result,
            } => {
                let token = wants_result.then(|| callback.callback_id());
                self.inject(kind, &source, token);
            }
            Command::Show => self.show(),
        }
    }

    fn open(&mut self, url: &str, target: Target, features: &str, callback: CallbackContext) {
        info!(url = %url, ?target, "open");
        let result = match target {
            Target::SelfView => self.open_self(url, features, callback.clone()),
            Target::System => self.open_external(url),
            Target::Blank => self.show_web_page(url, features, callback.clone()),
        };
        callback.send(PluginResult::ok(result).with_keep_callback(true));
    }

    /// Open in the primary view if a collaborator allows it.
    fn open_self(&mut self, url: &str, features: &str, callback: CallbackContext) -> String {
        let verdict = primary_verdict(
            url,
            self.platform.whitelist.as_deref(),
            self.platform.plugin_manager.as_deref(),
        );

        match verdict {
            PrimaryVerdict::Allow => {
                debug!(url = %url, "loading in primary view");
                if let Err(e) = self.platform.primary.load_url(url) {
                    warn!(url = %url, error = %e, "primary view load failed");
                }
                String::new()
            }
            _ if url.starts_with(SCHEME_TEL) => {
                handoff(self.platform.launcher.as_ref(), &Intent::dial(url));
                String::new()
            }
            PrimaryVerdict::Deny => {
                warn!(url = %url, "primary view navigation denied");
                String::new()
            }
            PrimaryVerdict::Undecided => self.show_web_page(url, features, callback),
        }
    }

    /// Hand a URL to the system browser. Returns the failure text, if any.
    fn open_external(&self, url: &str) -> String {
        let intent = Intent::system(url, &self.config.application_id);
        match self.platform.launcher.launch(&intent) {
            Ok(()) => String::new(),
            Err(e) => {
                warn!(url = %url, error = %e, "system browser launch failed");
                e.to_string()
            }
        }
    }

    /// Create and start an overlay session. Returns the failure text, if any.
    fn show_web_page(&mut self, url: &str, features: &str, callback: CallbackContext) -> String {
        let features = FeatureFlags::parse(features);
        self.close();

        let id = SessionId::new();
        let events = ViewEventSink::new();
        let handler = self.strategies.handler(
            &self.config.internal_plugin,
            HandlerContext {
                launcher: self.platform.launcher.clone(),
                fallback: self.platform.whitelist.clone(),
                plugin_manager: self.platform.plugin_manager.clone(),
                events: events.clone(),
            },
        );

        let mut view = match self.platform.views.create(ViewRequest {
            session: id.clone(),
            url: url.to_string(),
            show_location_bar: features.show_location_bar,
            handler: handler.clone(),
            events: events.clone(),
        }) {
            Ok(view) => view,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to create overlay view");
                return e.to_string();
            }
        };

        let driver = self.strategies.driver(&self.config.driver);
        driver.apply_settings(
            view.as_mut(),
            &DriverContext {
                features: &features,
                storage_enabled: self.config.storage_enabled,
                cookies: self.platform.cookies.as_deref(),
            },
        );

        info!(session = %id, url = %url, hidden = features.open_hidden, "session opened");
        let mut session = Session::new(
            id,
            url.to_string(),
            features,
            callback,
            view,
            handler,
            events,
        );
        session.start();
        self.session = Some(session);
        String::new()
    }

    /// Close the active session. Does nothing when none is open.
    pub(super) fn close(&mut self) {
        match self.session.take() {
            Some(session) => session.close(),
            None => debug!("close: no active session"),
        }
    }

    fn show(&mut self) {
        let Some(session) = self.session.as_mut() else {
            debug!("show: no active session");
            return;
        };
        session.present();
        session.send_result(PluginResult::empty_ok().with_keep_callback(true));
    }

    fn inject(&mut self, kind: InjectKind, source: &str, token: Option<&str>) {
        let Some(session) = self.session.as_mut() else {
            debug!(?kind, "inject: no active session");
            return;
        };
        let wrapper = kind.wrapper(token);
        let script = wrap_source(source, wrapper.as_deref());
        debug!(session = %session.id(), ?kind, with_result = token.is_some(), "injecting");
        session.evaluate(&script);
    }
}
