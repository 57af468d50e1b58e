//! Native-to-script result channel.
//!
//! The script bridge itself lives outside this workspace. Everything the
//! coordinator sends back to script goes through a [`Bridge`], addressed by
//! the callback id the bridge handed out when the command was invoked.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result status understood by the script side of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    InvalidAction,
    JsonException,
    Error,
}

impl Status {
    /// Numeric status code as transmitted to script.
    pub fn code(self) -> u8 {
        match self {
            Status::Ok => 1,
            Status::InvalidAction => 7,
            Status::JsonException => 8,
            Status::Error => 9,
        }
    }
}

/// A single result delivered to a script callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginResult {
    pub status: Status,
    pub message: Value,
    pub keep_callback: bool,
}

impl PluginResult {
    pub fn new(status: Status, message: impl Into<Value>) -> Self {
        Self {
            status,
            message: message.into(),
            keep_callback: false,
        }
    }

    pub fn ok(message: impl Into<Value>) -> Self {
        Self::new(Status::Ok, message)
    }

    /// An OK result with no payload.
    pub fn empty_ok() -> Self {
        Self::new(Status::Ok, Value::Null)
    }

    pub fn with_keep_callback(mut self, keep: bool) -> Self {
        self.keep_callback = keep;
        self
    }
}

/// Delivers results to callbacks registered on the script side.
///
/// Implementations must be callable from any thread.
pub trait Bridge: Send + Sync {
    fn send_plugin_result(&self, callback_id: &str, result: PluginResult);
}

/// The callback of one bridge invocation.
#[derive(Clone)]
pub struct CallbackContext {
    callback_id: String,
    bridge: Arc<dyn Bridge>,
}

impl CallbackContext {
    pub fn new(callback_id: impl Into<String>, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            callback_id: callback_id.into(),
            bridge,
        }
    }

    pub fn callback_id(&self) -> &str {
        &self.callback_id
    }

    pub fn bridge(&self) -> &Arc<dyn Bridge> {
        &self.bridge
    }

    pub fn send(&self, result: PluginResult) {
        tracing::trace!(
            callback_id = %self.callback_id,
            status = ?result.status,
            keep = result.keep_callback,
            "sending plugin result"
        );
        self.bridge.send_plugin_result(&self.callback_id, result);
    }
}

impl fmt::Debug for CallbackContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackContext")
            .field("callback_id", &self.callback_id)
            .finish_non_exhaustive()
    }
}
