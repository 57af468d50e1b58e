//! In-memory overlay views.
//!
//! A headless view has no engine: loads are decided by the session's
//! navigation handler and complete immediately. Every view hands out a
//! [`HeadlessProbe`] through which a harness can inspect it and play the
//! part of the page (link clicks, script completions, load errors).

use std::sync::{Arc, Mutex, MutexGuard};

use inappbrowser_common::ViewError;
use serde_json::json;
use tracing::{debug, trace};

use crate::events::{ViewEvent, ViewEventSink};
use crate::intent::SCHEME_JAVASCRIPT;
use crate::ipc::{view_event_from_ipc, ON_FINISH_KIND};
use crate::policy::{NavigationHandler, NavigationOutcome};
use crate::view::{BrowserView, ViewCapabilities, ViewFactory, ViewRequest};

#[derive(Debug, Default)]
struct ViewState {
    history: Vec<String>,
    index: usize,
    scripts: Vec<String>,
    show_location_bar: bool,
    visible: bool,
    destroyed: bool,
    zoom_controls: Option<bool>,
    database_enabled: Option<bool>,
}

impl ViewState {
    fn current(&self) -> Option<&str> {
        self.history.get(self.index).map(String::as_str)
    }

    fn commit(&mut self, url: &str) {
        if !self.history.is_empty() {
            self.history.truncate(self.index + 1);
        }
        self.history.push(url.to_string());
        self.index = self.history.len() - 1;
    }
}

#[derive(Clone)]
struct Shared {
    state: Arc<Mutex<ViewState>>,
    handler: Arc<dyn NavigationHandler>,
    events: ViewEventSink,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ViewState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Run a top-level navigation through the handler.
    fn navigate(&self, url: &str) -> NavigationOutcome {
        let outcome = self.handler.should_allow_navigation(url);
        trace!(url = %url, ?outcome, "headless navigation");
        if outcome.is_allowed() {
            self.state().commit(url);
            self.events.push(ViewEvent::PageFinished {
                url: url.to_string(),
            });
        }
        outcome
    }

    fn step(&self, delta: isize) -> Result<(), ViewError> {
        let url = {
            let mut state = self.state();
            let target = state
                .index
                .checked_add_signed(delta)
                .filter(|i| *i < state.history.len())
                .ok_or_else(|| ViewError::Navigation("no history entry".into()))?;
            state.index = target;
            state.history[target].clone()
        };
        self.events.push(ViewEvent::PageFinished { url });
        Ok(())
    }
}

/// Creates [`HeadlessView`]s and keeps a probe for each.
#[derive(Clone, Default)]
pub struct HeadlessViewFactory {
    capabilities: ViewCapabilities,
    unavailable: Option<String>,
    probes: Arc<Mutex<Vec<HeadlessProbe>>>,
}

impl HeadlessViewFactory {
    /// A factory whose views support everything.
    pub fn new() -> Self {
        Self::with_capabilities(ViewCapabilities::ALL)
    }

    pub fn with_capabilities(capabilities: ViewCapabilities) -> Self {
        Self {
            capabilities,
            ..Default::default()
        }
    }

    /// A factory that fails every creation, like a host without a web engine.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Probe of the most recently created view.
    pub fn last(&self) -> Option<HeadlessProbe> {
        self.probes.lock().ok()?.last().cloned()
    }

    /// Number of views created so far.
    pub fn created(&self) -> usize {
        self.probes.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl ViewFactory for HeadlessViewFactory {
    fn create(&self, request: ViewRequest) -> Result<Box<dyn BrowserView>, ViewError> {
        if let Some(reason) = &self.unavailable {
            return Err(ViewError::Creation(reason.clone()));
        }

        let shared = Shared {
            state: Arc::new(Mutex::new(ViewState {
                show_location_bar: request.show_location_bar,
                ..Default::default()
            })),
            handler: request.handler,
            events: request.events,
        };
        if let Ok(mut probes) = self.probes.lock() {
            probes.push(HeadlessProbe {
                shared: shared.clone(),
            });
        }
        debug!(session = %request.session, url = %request.url, "headless view created");

        Ok(Box::new(HeadlessView {
            capabilities: self.capabilities,
            shared,
        }))
    }
}

pub struct HeadlessView {
    capabilities: ViewCapabilities,
    shared: Shared,
}

impl HeadlessView {
    fn set_visible(&self, visible: bool) -> Result<(), ViewError> {
        let mut state = self.shared.state();
        if state.destroyed {
            return Err(ViewError::Visibility("view destroyed".into()));
        }
        state.visible = visible;
        Ok(())
    }
}

impl BrowserView for HeadlessView {
    fn capabilities(&self) -> ViewCapabilities {
        self.capabilities
    }

    fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        if let Some(script) = url.strip_prefix(SCHEME_JAVASCRIPT) {
            self.shared.state().scripts.push(script.to_string());
            return Ok(());
        }
        self.shared.navigate(url);
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<(), ViewError> {
        if !self.capabilities.async_evaluation {
            return Err(ViewError::NotSupported("script evaluation"));
        }
        self.shared.state().scripts.push(script.to_string());
        Ok(())
    }

    fn present(&mut self) -> Result<(), ViewError> {
        self.set_visible(true)
    }

    fn hide(&mut self) -> Result<(), ViewError> {
        self.set_visible(false)
    }

    fn can_go_back(&self) -> bool {
        self.shared.state().index > 0
    }

    fn go_back(&mut self) -> Result<(), ViewError> {
        self.shared.step(-1)
    }

    fn can_go_forward(&self) -> bool {
        let state = self.shared.state();
        state.index + 1 < state.history.len()
    }

    fn go_forward(&mut self) -> Result<(), ViewError> {
        if !self.capabilities.forward_navigation {
            return Err(ViewError::NotSupported("forward navigation"));
        }
        self.shared.step(1)
    }

    fn set_zoom_controls(&mut self, enabled: bool) -> Result<(), ViewError> {
        if !self.capabilities.zoom_controls {
            return Err(ViewError::NotSupported("zoom controls"));
        }
        self.shared.state().zoom_controls = Some(enabled);
        Ok(())
    }

    fn set_database_enabled(&mut self, enabled: bool) -> Result<(), ViewError> {
        if !self.capabilities.database_storage {
            return Err(ViewError::NotSupported("database storage"));
        }
        self.shared.state().database_enabled = Some(enabled);
        Ok(())
    }

    fn destroy(&mut self) {
        let mut state = self.shared.state();
        state.visible = false;
        state.destroyed = true;
    }
}

/// Inspects a headless view and acts as its page.
#[derive(Clone)]
pub struct HeadlessProbe {
    shared: Shared,
}

impl HeadlessProbe {
    /// Simulate the page following a link.
    pub fn navigate(&self, url: &str) -> NavigationOutcome {
        self.shared.navigate(url)
    }

    /// Deliver a raw IPC body as if posted by page script.
    pub fn post_message(&self, body: &str) -> bool {
        match view_event_from_ipc(body) {
            Some(event) => {
                self.shared.events.push(event);
                true
            }
            None => false,
        }
    }

    /// Simulate injected code calling `onFinish(message, callback_id)`.
    pub fn complete_script(&self, message: &str, callback_id: &str) -> bool {
        let body = json!({
            "kind": ON_FINISH_KIND,
            "payload": { "message": message, "callbackId": callback_id },
        });
        self.post_message(&body.to_string())
    }

    pub fn fail(&self, code: i32, description: &str, url: &str) {
        self.shared.events.push(ViewEvent::ReceivedError {
            code,
            description: description.to_string(),
            url: url.to_string(),
        });
    }

    pub fn back_pressed(&self) {
        self.shared.events.push(ViewEvent::BackPressed);
    }

    /// The platform dismissed the view.
    pub fn dismiss(&self) {
        self.shared.events.push(ViewEvent::Exit);
    }

    pub fn history(&self) -> Vec<String> {
        self.shared.state().history.clone()
    }

    pub fn current_url(&self) -> Option<String> {
        self.shared.state().current().map(str::to_string)
    }

    /// Every script evaluated so far, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.shared.state().scripts.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.state().visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.state().destroyed
    }

    pub fn shows_location_bar(&self) -> bool {
        self.shared.state().show_location_bar
    }

    pub fn zoom_controls(&self) -> Option<bool> {
        self.shared.state().zoom_controls
    }

    pub fn database_enabled(&self) -> Option<bool> {
        self.shared.state().database_enabled
    }
}
