//! Overlay view events and the messages relayed to script.

use std::sync::{Arc, Mutex};

use inappbrowser_common::Status;
use serde::Serialize;

/// Raw callbacks from the overlay view, queued for the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A top-level http(s) navigation was allowed.
    PageStarted { url: String },
    /// A page finished loading.
    PageFinished { url: String },
    /// A page failed to load.
    ReceivedError {
        code: i32,
        description: String,
        url: String,
    },
    /// Injected code called `__inappbrowser.onFinish(message, token)`.
    ScriptFinished { message: String, callback_id: String },
    /// The device back button was pressed while the view had focus.
    BackPressed,
    /// The view was dismissed by the platform or the user.
    Exit,
}

/// Event queue shared between a view's platform callbacks and the UI loop.
#[derive(Debug, Clone, Default)]
pub struct ViewEventSink {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl ViewEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: ViewEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Take all pending events in arrival order.
    pub fn drain(&self) -> Vec<ViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().map(|e| e.is_empty()).unwrap_or(true)
    }
}

/// Messages delivered on a session's open callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BrowserEvent {
    LoadStart {
        url: String,
    },
    LoadStop {
        url: String,
    },
    LoadError {
        url: String,
        code: i32,
        message: String,
    },
    Exit,
}

impl BrowserEvent {
    pub fn status(&self) -> Status {
        match self {
            BrowserEvent::LoadError { .. } => Status::Error,
            _ => Status::Ok,
        }
    }

    /// Exit is the last message of a session; everything else keeps the
    /// callback alive.
    pub fn keep_callback(&self) -> bool {
        !matches!(self, BrowserEvent::Exit)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
