//! Overlay views backed by `wry`.
//!
//! Each session gets a child webview of the host window. Navigation, page
//! load, and IPC callbacks run on the UI thread and only push onto the
//! session's event sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inappbrowser_common::ViewError;
use tracing::{debug, warn};
use wry::raw_window_handle::HasWindowHandle;
use wry::{PageLoadEvent, Rect, WebView, WebViewBuilder};

use crate::events::{ViewEvent, ViewEventSink};
use crate::ipc::{view_event_from_ipc, BRIDGE_INIT_SCRIPT};
use crate::view::{BrowserView, ViewCapabilities, ViewFactory, ViewRequest};

const CAPABILITIES: ViewCapabilities = ViewCapabilities {
    zoom_controls: false,
    forward_navigation: true,
    async_evaluation: true,
    database_storage: false,
};

/// Creates overlay webviews as children of a host window.
pub struct WryViewFactory<W: HasWindowHandle> {
    window: W,
    bounds: Rect,
}

impl<W: HasWindowHandle> WryViewFactory<W> {
    pub fn new(window: W, bounds: Rect) -> Self {
        Self { window, bounds }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }
}

impl<W: HasWindowHandle> ViewFactory for WryViewFactory<W> {
    fn create(&self, request: ViewRequest) -> Result<Box<dyn BrowserView>, ViewError> {
        let depth = Arc::new(AtomicUsize::new(0));

        let handler = Arc::clone(&request.handler);
        let nav_session = request.session.clone();
        let load_events = request.events.clone();
        let load_depth = Arc::clone(&depth);
        let ipc_events = request.events.clone();

        if !request.show_location_bar {
            debug!(session = %request.session, "location bar hidden");
        }

        let webview = WebViewBuilder::new()
            .with_bounds(self.bounds)
            .with_visible(false)
            .with_focused(true)
            .with_initialization_script(BRIDGE_INIT_SCRIPT)
            .with_navigation_handler(move |url| {
                let outcome = handler.should_allow_navigation(&url);
                debug!(session = %nav_session, url = %url, ?outcome, "navigation");
                outcome.is_allowed()
            })
            .with_on_page_load_handler(move |event, url| {
                if let PageLoadEvent::Finished = event {
                    load_depth.fetch_add(1, Ordering::Relaxed);
                    load_events.push(ViewEvent::PageFinished { url });
                }
            })
            .with_ipc_handler(move |request| {
                if let Some(event) = view_event_from_ipc(request.body()) {
                    ipc_events.push(event);
                }
            })
            .build_as_child(&self.window)
            .map_err(|e| ViewError::Creation(e.to_string()))?;

        debug!(session = %request.session, url = %request.url, "wry view created");
        Ok(Box::new(WryView {
            webview: Some(webview),
            depth,
            events: request.events,
        }))
    }
}

pub struct WryView {
    webview: Option<WebView>,
    /// Best-effort count of finished loads, used as the back-stack depth.
    depth: Arc<AtomicUsize>,
    events: ViewEventSink,
}

impl WryView {
    fn webview(&self) -> Result<&WebView, ViewError> {
        self.webview
            .as_ref()
            .ok_or_else(|| ViewError::Navigation("view destroyed".into()))
    }

    fn run(&self, script: &str) -> Result<(), ViewError> {
        self.webview()?
            .evaluate_script(script)
            .map_err(|e| ViewError::Script(e.to_string()))
    }
}

impl BrowserView for WryView {
    fn capabilities(&self) -> ViewCapabilities {
        CAPABILITIES
    }

    fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        self.webview()?
            .load_url(url)
            .map_err(|e| ViewError::Navigation(e.to_string()))
    }

    fn evaluate_script(&mut self, script: &str) -> Result<(), ViewError> {
        self.run(script)
    }

    fn present(&mut self) -> Result<(), ViewError> {
        let webview = self.webview()?;
        webview
            .set_visible(true)
            .and_then(|()| webview.focus())
            .map_err(|e| ViewError::Visibility(e.to_string()))
    }

    fn hide(&mut self) -> Result<(), ViewError> {
        self.webview()?
            .set_visible(false)
            .map_err(|e| ViewError::Visibility(e.to_string()))
    }

    fn can_go_back(&self) -> bool {
        self.depth.load(Ordering::Relaxed) > 1
    }

    fn go_back(&mut self) -> Result<(), ViewError> {
        self.run("history.back()")?;
        // The page load that follows counts again.
        let _ = self
            .depth
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| d.checked_sub(2));
        Ok(())
    }

    fn can_go_forward(&self) -> bool {
        true
    }

    fn go_forward(&mut self) -> Result<(), ViewError> {
        self.run("history.forward()")
    }

    fn destroy(&mut self) {
        if let Some(webview) = self.webview.take() {
            if let Err(e) = webview.set_visible(false) {
                warn!(error = %e, "failed to hide webview before destroy");
            }
            drop(webview);
        }
        // Callbacks that were already queued belong to a dead session.
        self.events.drain();
    }
}
