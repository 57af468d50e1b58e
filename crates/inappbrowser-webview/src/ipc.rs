//! IPC between page script in the overlay view and the coordinator.
//!
//! The overlay exposes a `__inappbrowser` object to page script. Its
//! `onFinish(message, token)` posts a JSON message over the view's native
//! channel (`window.ipc.postMessage`), which is decoded here into a
//! [`ViewEvent::ScriptFinished`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::events::ViewEvent;

pub const ON_FINISH_KIND: &str = "onFinish";

/// A typed IPC message from the overlay view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Payload of an `onFinish` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishPayload {
    #[serde(default)]
    pub message: String,
    pub callback_id: String,
}

impl IpcMessage {
    /// Parse an IPC message from the raw JSON body posted by the page.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Decode a raw IPC body into a view event.
///
/// Malformed or unknown messages are logged and dropped.
pub fn view_event_from_ipc(body: &str) -> Option<ViewEvent> {
    let Some(msg) = IpcMessage::from_json(body) else {
        warn!(body_len = body.len(), "IPC message rejected: invalid JSON");
        return None;
    };

    match msg.kind.as_str() {
        ON_FINISH_KIND => match serde_json::from_value::<FinishPayload>(msg.payload) {
            Ok(p) => Some(ViewEvent::ScriptFinished {
                message: p.message,
                callback_id: p.callback_id,
            }),
            Err(e) => {
                warn!(error = %e, "IPC onFinish rejected: bad payload");
                None
            }
        },
        other => {
            warn!(kind = %other, "IPC message rejected: unknown kind");
            None
        }
    }
}

/// Installed as an initialization script in every overlay view.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    window.__inappbrowser = {
        onFinish: function(message, callbackId) {
            window.ipc.postMessage(JSON.stringify({
                kind: "onFinish",
                payload: { message: String(message || ""), callbackId: String(callbackId) }
            }));
        }
    };
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_on_finish() {
        let body = r#"{"kind":"onFinish","payload":{"message":"[2]","callbackId":"InAppBrowser4"}}"#;
        assert_eq!(
            view_event_from_ipc(body),
            Some(ViewEvent::ScriptFinished {
                message: "[2]".into(),
                callback_id: "InAppBrowser4".into(),
            })
        );
    }

    #[test]
    fn missing_message_is_empty() {
        let body = r#"{"kind":"onFinish","payload":{"callbackId":"InAppBrowser4"}}"#;
        assert!(matches!(
            view_event_from_ipc(body),
            Some(ViewEvent::ScriptFinished { ref message, .. }) if message.is_empty()
        ));
    }

    #[test]
    fn rejects_garbage_and_unknown_kinds() {
        assert!(view_event_from_ipc("not json").is_none());
        assert!(view_event_from_ipc(r#"{"kind":"exec","payload":"rm -rf /"}"#).is_none());
        assert!(view_event_from_ipc(r#"{"kind":"onFinish","payload":{}}"#).is_none());
    }

    #[test]
    fn init_script_defines_interface() {
        assert!(BRIDGE_INIT_SCRIPT.contains("window.__inappbrowser"));
        assert!(BRIDGE_INIT_SCRIPT.contains("onFinish"));
    }
}
