//! UI-thread coordinator.
//!
//! Owns the at-most-one overlay [`Session`] and every platform collaborator.
//! Bridge commands arrive through the [`Dispatcher`] queue; view callbacks
//! arrive through the session's [`ViewEventSink`](crate::events::ViewEventSink).
//! The host calls [`Coordinator::run_pending`] from its UI loop to apply
//! both.

mod handlers;
mod lifecycle;

use std::sync::Arc;

use inappbrowser_config::BrowserConfig;
use tokio::sync::mpsc;
use tracing::debug;

use crate::dispatcher::{Dispatcher, UiTask};
use crate::intent::ExternalLauncher;
use crate::policy::{PluginManager, UrlPolicy};
use crate::registry::StrategyRegistry;
use crate::session::Session;
use crate::view::{CookieStore, PrimaryView, ViewFactory};

/// Host-provided collaborators.
pub struct Platform {
    pub primary: Box<dyn PrimaryView>,
    pub launcher: Arc<dyn ExternalLauncher>,
    pub views: Box<dyn ViewFactory>,
    pub cookies: Option<Arc<dyn CookieStore>>,
    /// The host's navigation allow-list.
    pub whitelist: Option<Arc<dyn UrlPolicy>>,
    pub plugin_manager: Option<Arc<dyn PluginManager>>,
}

pub struct Coordinator {
    platform: Platform,
    config: BrowserConfig,
    strategies: StrategyRegistry,
    tasks: mpsc::UnboundedReceiver<UiTask>,
    session: Option<Session>,
}

impl Coordinator {
    /// Create a coordinator and the dispatcher that feeds it.
    pub fn new(
        platform: Platform,
        config: BrowserConfig,
        strategies: StrategyRegistry,
    ) -> (Self, Dispatcher) {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            platform,
            config,
            strategies,
            tasks: rx,
            session: None,
        };
        (coordinator, Dispatcher::new(tx))
    }

    /// Apply queued commands and view events until both queues are empty.
    ///
    /// Handling one may produce more of the other (a load queues page
    /// events, an exit event closes the session), so this loops.
    pub fn run_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let mut progressed = false;

            while let Ok(task) = self.tasks.try_recv() {
                match task {
                    UiTask::Command { command, callback } => {
                        self.apply(command, callback);
                    }
                }
                handled += 1;
                progressed = true;
            }

            let events = self
                .session
                .as_ref()
                .map(|s| s.events().drain())
                .unwrap_or_default();
            for event in events {
                // An earlier event in this batch may have closed the session.
                if self.session.is_none() {
                    debug!(?event, "dropping event for closed session");
                    continue;
                }
                self.handle_view_event(event);
                handled += 1;
                progressed = true;
            }

            if !progressed {
                return handled;
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}
