//! View callbacks and host lifecycle hooks.

use tracing::{debug, info};

use super::Coordinator;
use crate::events::{BrowserEvent, ViewEvent};
use crate::relay::deliver_script_result;
use crate::session::BackAction;

impl Coordinator {
    pub(super) fn handle_view_event(&mut self, event: ViewEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match event {
            ViewEvent::PageStarted { url } => session.relay(BrowserEvent::LoadStart { url }),
            ViewEvent::PageFinished { url } => session.relay(BrowserEvent::LoadStop { url }),
            ViewEvent::ReceivedError {
                code,
                description,
                url,
            } => session.relay(BrowserEvent::LoadError {
                url,
                code,
                message: description,
            }),
            ViewEvent::ScriptFinished {
                message,
                callback_id,
            } => {
                deliver_script_result(session.bridge(), &message, &callback_id);
            }
            ViewEvent::BackPressed => {
                if session.back_pressed() == BackAction::Close {
                    self.close();
                }
            }
            ViewEvent::Exit => self.close(),
        }
    }

    /// Toolbar back button. Returns whether the view navigated.
    pub fn go_back(&mut self) -> bool {
        self.session.as_mut().is_some_and(|s| s.go_back())
    }

    /// Toolbar forward button. Returns whether the view navigated.
    pub fn go_forward(&mut self) -> bool {
        self.session.as_mut().is_some_and(|s| s.go_forward())
    }

    /// HTTP auth challenge raised by the overlay view.
    ///
    /// Returns true if a plugin will answer it; otherwise the view cancels.
    pub fn on_http_auth_request(&self, host: &str, realm: &str) -> bool {
        match &self.session {
            Some(session) => session.handler().on_http_auth_request(host, realm),
            None => {
                debug!(host = %host, "auth challenge without a session");
                false
            }
        }
    }

    /// The primary view navigated away; the overlay goes with it.
    pub fn on_reset(&mut self) {
        info!("host reset; closing overlay");
        self.close();
    }

    /// The host is shutting down.
    pub fn on_destroy(&mut self) {
        info!("host destroyed; closing overlay");
        self.close();
    }
}
