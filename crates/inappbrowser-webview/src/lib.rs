//! In-app browser coordinator.
//!
//! Opens URLs in the host's primary web view, in an external application,
//! or in an overlay web view, and reports what happens back over the
//! script bridge:
//! - Command dispatch from any thread onto the UI thread
//! - Scheme-based navigation policy with external hand-off (tel, sms, mail, geo, market)
//! - Lifecycle events (`loadstart`, `loadstop`, `loaderror`, `exit`) per session
//! - Script and style injection with completion callbacks
//!
//! # Quick Start
//!
//! ```rust,no_run
//! # use inappbrowser_webview::{Coordinator, Platform, StrategyRegistry};
//! # fn platform() -> Platform { unimplemented!() }
//! let (mut coordinator, dispatcher) = Coordinator::new(
//!     platform(),
//!     inappbrowser_config::BrowserConfig::default(),
//!     StrategyRegistry::new(),
//! );
//! // Hand `dispatcher` to the bridge; call this from the UI loop:
//! coordinator.run_pending();
//! ```

pub mod coordinator;
pub mod dispatcher;
pub mod driver;
pub mod events;
pub mod features;
pub mod headless;
pub mod inject;
pub mod intent;
pub mod ipc;
pub mod policy;
pub mod registry;
pub mod relay;
pub mod session;
pub mod view;
#[cfg(feature = "wry")]
pub mod wry_view;

pub use coordinator::{Coordinator, Platform};
pub use dispatcher::{Command, CommandArgs, Dispatcher, Handled, Target};
pub use driver::{DefaultDriver, DriverContext, SessionDriver};
pub use events::{BrowserEvent, ViewEvent, ViewEventSink};
pub use features::{CachePolicy, FeatureFlags};
pub use headless::{HeadlessProbe, HeadlessViewFactory};
pub use inject::InjectKind;
pub use intent::{ExternalLauncher, Intent, IntentAction};
pub use policy::{
    DefaultNavigationHandler, HandlerContext, NavigationHandler, NavigationOutcome, PluginManager,
    UrlPolicy,
};
pub use registry::StrategyRegistry;
pub use session::Session;
pub use view::{BrowserView, CookieStore, PrimaryView, ViewCapabilities, ViewFactory, ViewRequest};
#[cfg(feature = "wry")]
pub use wry_view::{WryView, WryViewFactory};
