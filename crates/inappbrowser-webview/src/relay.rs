//! Event relay back to script.
//!
//! Two channels leave the coordinator:
//! - the session's open callback, which carries lifecycle events until the
//!   terminal `exit` releases it, and
//! - per-injection tokens, which carry script completion results.

use inappbrowser_common::{Bridge, CallbackContext, PluginResult, Status};
use serde_json::Value;
use tracing::{debug, warn};

use crate::events::BrowserEvent;

/// Namespace every script completion token must start with.
pub const CALLBACK_PREFIX: &str = "InAppBrowser";

/// Holds the single pending open callback of a session.
#[derive(Debug)]
pub struct EventRelay {
    pending: Option<CallbackContext>,
}

impl EventRelay {
    pub fn new(callback: CallbackContext) -> Self {
        Self {
            pending: Some(callback),
        }
    }

    /// Whether the open callback is still held.
    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Send a lifecycle event. Returns false once the callback was released.
    pub fn send_update(&mut self, event: &BrowserEvent) -> bool {
        let result = PluginResult::new(event.status(), event.to_json())
            .with_keep_callback(event.keep_callback());
        self.send(result)
    }

    /// Send an arbitrary result on the open callback.
    ///
    /// A result without `keep_callback` releases the callback.
    pub fn send(&mut self, result: PluginResult) -> bool {
        let Some(callback) = self.pending.as_ref() else {
            debug!("relay closed; dropping result");
            return false;
        };
        let keep = result.keep_callback;
        callback.send(result);
        if !keep {
            self.pending = None;
        }
        true
    }
}

/// Convert the message passed to `onFinish` into a bridge result.
///
/// An empty message is an empty array; a JSON array passes through; any
/// other JSON value is wrapped in a one-element array. Unparseable text
/// yields a JSON-exception result carrying the parser message.
pub fn script_result(message: &str) -> PluginResult {
    if message.is_empty() {
        return PluginResult::ok(Value::Array(Vec::new()));
    }
    match serde_json::from_str::<Value>(message) {
        Ok(Value::Array(items)) => PluginResult::ok(Value::Array(items)),
        Ok(other) => PluginResult::ok(Value::Array(vec![other])),
        Err(e) => PluginResult::new(Status::JsonException, e.to_string()),
    }
}

/// Deliver a script completion to its token.
///
/// Tokens outside the reserved namespace come from untrusted page script
/// and are dropped. Returns whether the result was delivered.
pub fn deliver_script_result(bridge: &dyn Bridge, message: &str, callback_id: &str) -> bool {
    if !callback_id.starts_with(CALLBACK_PREFIX) {
        warn!(callback_id = %callback_id, "script result rejected: foreign callback token");
        return false;
    }
    bridge.send_plugin_result(callback_id, script_result(message));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(String, PluginResult)>>);

    impl Bridge for Recorder {
        fn send_plugin_result(&self, callback_id: &str, result: PluginResult) {
            self.0.lock().unwrap().push((callback_id.to_string(), result));
        }
    }

    fn relay() -> (Arc<Recorder>, EventRelay) {
        let recorder = Arc::new(Recorder::default());
        let callback = CallbackContext::new("InAppBrowser1", recorder.clone());
        (recorder, EventRelay::new(callback))
    }

    #[test]
    fn lifecycle_events_keep_the_callback() {
        let (recorder, mut relay) = relay();
        assert!(relay.send_update(&BrowserEvent::LoadStart {
            url: "https://example.com".into()
        }));
        assert!(relay.is_open());

        let sent = recorder.0.lock().unwrap();
        assert!(sent[0].1.keep_callback);
        assert_eq!(sent[0].1.status, Status::Ok);
    }

    #[test]
    fn exit_releases_the_callback() {
        let (recorder, mut relay) = relay();
        assert!(relay.send_update(&BrowserEvent::Exit));
        assert!(!relay.is_open());
        assert!(!relay.send_update(&BrowserEvent::Exit));

        let sent = recorder.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].1.keep_callback);
    }

    #[test]
    fn load_error_uses_error_status() {
        let (recorder, mut relay) = relay();
        relay.send_update(&BrowserEvent::LoadError {
            url: "https://x".into(),
            code: -6,
            message: "connection refused".into(),
        });
        assert_eq!(recorder.0.lock().unwrap()[0].1.status, Status::Error);
    }

    #[test]
    fn script_result_shapes() {
        assert_eq!(script_result("").message, serde_json::json!([]));
        assert_eq!(script_result("[2]").message, serde_json::json!([2]));
        assert_eq!(script_result("\"2\"").message, serde_json::json!(["2"]));
        assert_eq!(script_result("2").message, serde_json::json!([2]));

        let bad = script_result("[unterminated");
        assert_eq!(bad.status, Status::JsonException);
        assert!(bad.message.as_str().is_some_and(|m| !m.is_empty()));
    }

    #[test]
    fn foreign_tokens_are_rejected() {
        let recorder = Recorder::default();
        assert!(!deliver_script_result(&recorder, "[1]", "evil-callback"));
        assert!(deliver_script_result(&recorder, "[1]", "InAppBrowser42"));

        let sent = recorder.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "InAppBrowser42");
        assert!(!sent[0].1.keep_callback);
    }
}
