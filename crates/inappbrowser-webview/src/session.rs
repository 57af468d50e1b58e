//! One overlay browser lifetime, from open to exit.

use std::sync::Arc;

use inappbrowser_common::{Bridge, CallbackContext, PluginResult, SessionId};
use tracing::{debug, info, warn};

use crate::events::{BrowserEvent, ViewEventSink};
use crate::features::FeatureFlags;
use crate::intent::SCHEME_JAVASCRIPT;
use crate::policy::NavigationHandler;
use crate::relay::EventRelay;
use crate::view::BrowserView;

/// What the device back button did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    WentBack,
    /// The session should close.
    Close,
}

pub struct Session {
    id: SessionId,
    url: String,
    current_url: String,
    features: FeatureFlags,
    visible: bool,
    relay: EventRelay,
    bridge: Arc<dyn Bridge>,
    view: Box<dyn BrowserView>,
    handler: Arc<dyn NavigationHandler>,
    events: ViewEventSink,
}

impl Session {
    pub(crate) fn new(
        id: SessionId,
        url: String,
        features: FeatureFlags,
        callback: CallbackContext,
        view: Box<dyn BrowserView>,
        handler: Arc<dyn NavigationHandler>,
        events: ViewEventSink,
    ) -> Self {
        let bridge = Arc::clone(callback.bridge());
        Self {
            id,
            current_url: url.clone(),
            url,
            features,
            visible: false,
            relay: EventRelay::new(callback),
            bridge,
            view,
            handler,
            events,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The URL the session was opened with.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Best-effort URL of the page currently shown (the location bar).
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.features
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn handler(&self) -> &Arc<dyn NavigationHandler> {
        &self.handler
    }

    pub(crate) fn events(&self) -> &ViewEventSink {
        &self.events
    }

    pub(crate) fn bridge(&self) -> &dyn Bridge {
        self.bridge.as_ref()
    }

    pub(crate) fn relay(&mut self, event: BrowserEvent) {
        if let BrowserEvent::LoadStart { url } = &event {
            if *url != self.current_url {
                self.current_url = url.clone();
            }
        }
        self.relay.send_update(&event);
    }

    pub(crate) fn send_result(&mut self, result: PluginResult) {
        self.relay.send(result);
    }

    /// Start loading the initial URL and present unless opened hidden.
    pub(crate) fn start(&mut self) {
        if let Err(e) = self.view.load_url(&self.url) {
            warn!(session = %self.id, url = %self.url, error = %e, "initial load failed");
        }
        if self.features.open_hidden {
            debug!(session = %self.id, "opened hidden");
            if let Err(e) = self.view.hide() {
                warn!(session = %self.id, error = %e, "failed to hide view");
            }
        } else {
            self.present();
        }
    }

    pub(crate) fn present(&mut self) {
        match self.view.present() {
            Ok(()) => self.visible = true,
            Err(e) => warn!(session = %self.id, error = %e, "failed to present view"),
        }
    }

    /// Evaluate generated script in the overlay.
    ///
    /// Engines without asynchronous evaluation get a `javascript:` load.
    pub(crate) fn evaluate(&mut self, script: &str) {
        let result = if self.view.capabilities().async_evaluation {
            self.view.evaluate_script(script)
        } else {
            self.view.load_url(&format!("{SCHEME_JAVASCRIPT}{script}"))
        };
        if let Err(e) = result {
            warn!(session = %self.id, error = %e, "script injection failed");
        }
    }

    pub(crate) fn go_back(&mut self) -> bool {
        if !self.view.can_go_back() {
            return false;
        }
        match self.view.go_back() {
            Ok(()) => true,
            Err(e) => {
                warn!(session = %self.id, error = %e, "go back failed");
                false
            }
        }
    }

    pub(crate) fn go_forward(&mut self) -> bool {
        if !self.view.capabilities().forward_navigation || !self.view.can_go_forward() {
            return false;
        }
        match self.view.go_forward() {
            Ok(()) => true,
            Err(e) => {
                warn!(session = %self.id, error = %e, "go forward failed");
                false
            }
        }
    }

    pub(crate) fn back_pressed(&mut self) -> BackAction {
        if self.features.hardware_back && self.go_back() {
            BackAction::WentBack
        } else {
            BackAction::Close
        }
    }

    /// Tear the view down and send the terminal exit event.
    pub(crate) fn close(mut self) {
        self.view.destroy();
        self.relay.send_update(&BrowserEvent::Exit);
        info!(session = %self.id, "session closed");
    }
}
