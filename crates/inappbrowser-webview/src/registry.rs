//! Name-keyed strategy registry.
//!
//! Hosts pick the session driver and the overlay navigation handler by
//! name in their preferences. Anything not registered falls back to the
//! built-in strategy under [`DEFAULT_STRATEGY`].

use std::collections::HashMap;
use std::sync::Arc;

use inappbrowser_config::DEFAULT_STRATEGY;
use tracing::{debug, warn};

use crate::driver::{DefaultDriver, SessionDriver};
use crate::policy::{DefaultNavigationHandler, HandlerContext, NavigationHandler};

pub type DriverFactory = Box<dyn Fn() -> Box<dyn SessionDriver>>;
pub type HandlerFactory = Box<dyn Fn(HandlerContext) -> Arc<dyn NavigationHandler>>;

pub struct StrategyRegistry {
    drivers: HashMap<String, DriverFactory>,
    handlers: HashMap<String, HandlerFactory>,
}

impl StrategyRegistry {
    /// A registry holding only the built-in strategies.
    pub fn new() -> Self {
        let mut registry = Self {
            drivers: HashMap::new(),
            handlers: HashMap::new(),
        };
        registry.register_driver(DEFAULT_STRATEGY, || Box::new(DefaultDriver));
        registry.register_handler(DEFAULT_STRATEGY, |ctx| {
            Arc::new(DefaultNavigationHandler::new(ctx))
        });
        registry
    }

    pub fn register_driver<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn SessionDriver> + 'static,
    {
        let name = name.into();
        debug!(name = %name, "session driver registered");
        self.drivers.insert(name, Box::new(factory));
    }

    pub fn register_handler<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(HandlerContext) -> Arc<dyn NavigationHandler> + 'static,
    {
        let name = name.into();
        debug!(name = %name, "navigation handler registered");
        self.handlers.insert(name, Box::new(factory));
    }

    /// Instantiate the driver registered under `name`.
    pub fn driver(&self, name: &str) -> Box<dyn SessionDriver> {
        match self.drivers.get(name) {
            Some(factory) => factory(),
            None => {
                warn!(name = %name, "unknown session driver; using default");
                Box::new(DefaultDriver)
            }
        }
    }

    /// Instantiate the navigation handler registered under `name`.
    pub fn handler(&self, name: &str, ctx: HandlerContext) -> Arc<dyn NavigationHandler> {
        match self.handlers.get(name) {
            Some(factory) => factory(ctx),
            None => {
                warn!(name = %name, "unknown navigation handler; using default");
                Arc::new(DefaultNavigationHandler::new(ctx))
            }
        }
    }

    pub fn has_driver(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ViewEventSink;
    use crate::intent::{ExternalLauncher, Intent};
    use crate::policy::NavigationOutcome;
    use inappbrowser_common::HandoffError;

    struct NoLauncher;

    impl ExternalLauncher for NoLauncher {
        fn launch(&self, intent: &Intent) -> Result<(), HandoffError> {
            Err(HandoffError::NoHandler(intent.data.clone()))
        }
    }

    struct BlockEverything;

    impl NavigationHandler for BlockEverything {
        fn should_allow_navigation(&self, _url: &str) -> NavigationOutcome {
            NavigationOutcome::Block
        }
        fn should_allow_request(&self, _url: &str) -> bool {
            false
        }
    }

    fn ctx() -> HandlerContext {
        HandlerContext {
            launcher: Arc::new(NoLauncher),
            fallback: None,
            plugin_manager: None,
            events: ViewEventSink::new(),
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = StrategyRegistry::new();
        assert!(registry.has_driver("default"));
        assert!(registry.has_handler("default"));
    }

    #[test]
    fn custom_handler_is_selected_by_name() {
        let mut registry = StrategyRegistry::new();
        registry.register_handler("kiosk", |_ctx| Arc::new(BlockEverything));

        let kiosk = registry.handler("kiosk", ctx());
        assert_eq!(
            kiosk.should_allow_navigation("https://example.com"),
            NavigationOutcome::Block
        );

        let default = registry.handler("default", ctx());
        assert!(default.should_allow_navigation("https://example.com").is_allowed());
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        let registry = StrategyRegistry::new();
        let handler = registry.handler("org.example.Missing", ctx());
        assert!(handler.should_allow_navigation("https://example.com").is_allowed());
        // Falls back without panicking.
        let _driver = registry.driver("org.example.Missing");
    }
}
