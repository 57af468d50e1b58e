//! Headless host: collaborators that print what a device would do.

use std::io::Write;
use std::sync::{Arc, Mutex};

use inappbrowser_common::{Bridge, HandoffError, PluginResult, Status, ViewError};
use inappbrowser_webview::{ExternalLauncher, Intent, PrimaryView, UrlPolicy};
use serde::Serialize;
use serde_json::Value;

/// One line of harness output.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record<'a> {
    Result {
        #[serde(rename = "callbackId")]
        callback_id: &'a str,
        status: Status,
        code: u8,
        message: &'a Value,
        #[serde(rename = "keepCallback")]
        keep_callback: bool,
    },
    Launch {
        intent: &'a Intent,
    },
    Primary {
        url: &'a str,
    },
    Auth {
        host: &'a str,
        handled: bool,
    },
}

/// Line-oriented JSON sink shared by every collaborator.
#[derive(Clone)]
pub struct Output {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn emit(&self, record: &Record<'_>) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize output record");
                return;
            }
        };
        if let Ok(mut out) = self.out.lock() {
            if let Err(e) = writeln!(out, "{line}") {
                tracing::error!(error = %e, "failed to write output");
            }
        }
    }
}

pub struct PrintBridge(pub Output);

impl Bridge for PrintBridge {
    fn send_plugin_result(&self, callback_id: &str, result: PluginResult) {
        self.0.emit(&Record::Result {
            callback_id,
            status: result.status,
            code: result.status.code(),
            message: &result.message,
            keep_callback: result.keep_callback,
        });
    }
}

/// Reports every hand-off and pretends an application accepted it.
pub struct PrintLauncher(pub Output);

impl ExternalLauncher for PrintLauncher {
    fn launch(&self, intent: &Intent) -> Result<(), HandoffError> {
        self.0.emit(&Record::Launch { intent });
        Ok(())
    }
}

pub struct PrintPrimary(pub Output);

impl PrimaryView for PrintPrimary {
    fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        self.0.emit(&Record::Primary { url });
        Ok(())
    }
}

/// Prefix allow-list built from `--allow` flags.
pub struct PrefixAllowList(pub Vec<String>);

impl UrlPolicy for PrefixAllowList {
    fn should_allow_navigation(&self, url: &str) -> Option<bool> {
        Some(self.0.iter().any(|prefix| url.starts_with(prefix.as_str())))
    }

    fn should_allow_request(&self, url: &str) -> Option<bool> {
        self.should_allow_navigation(url)
    }
}
