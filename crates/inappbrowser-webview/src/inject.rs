//! Script and style injection into the overlay view.
//!
//! Arbitrary source text is embedded into a generated expression by
//! JSON-escaping it, so quotes, backslashes, and line breaks in the source
//! can never terminate the surrounding string literal. Wrappers that want a
//! completion report call `__inappbrowser.onFinish(message, token)`, which
//! the view routes back as a script-finished event.

/// Placeholder replaced by the escaped source inside a wrapper.
pub const MARKER: &str = "%s";

/// Name of the object the view exposes to page script.
pub const JS_INTERFACE: &str = "__inappbrowser";

/// What an injection inserts into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectKind {
    ScriptCode,
    ScriptFile,
    StyleCode,
    StyleFile,
}

impl InjectKind {
    /// Build the wrapper template for this kind.
    ///
    /// `callback_id` is set when the caller wants a completion result. A
    /// plain script without a callback needs no wrapper and runs verbatim.
    pub fn wrapper(self, callback_id: Option<&str>) -> Option<String> {
        let token = callback_id.map(js_string);
        let wrapper = match (self, token) {
            (InjectKind::ScriptCode, None) => return None,
            (InjectKind::ScriptCode, Some(token)) => format!(
                "{JS_INTERFACE}.onFinish(JSON.stringify([eval(\"{MARKER}\")]), {token})"
            ),
            (InjectKind::ScriptFile, None) => format!(
                "(function(d) {{ var c = d.createElement('script'); c.src = \"{MARKER}\"; d.body.appendChild(c); }})(document)"
            ),
            (InjectKind::ScriptFile, Some(token)) => format!(
                "(function(d) {{ var c = d.createElement('script'); c.src = \"{MARKER}\"; c.onload = function() {{ {JS_INTERFACE}.onFinish('', {token}); }}; d.body.appendChild(c); }})(document)"
            ),
            (InjectKind::StyleCode, None) => format!(
                "(function(d) {{ var c = d.createElement('style'); c.innerHTML = \"{MARKER}\"; d.body.appendChild(c); }})(document)"
            ),
            (InjectKind::StyleCode, Some(token)) => format!(
                "(function(d) {{ var c = d.createElement('style'); c.innerHTML = \"{MARKER}\"; d.body.appendChild(c); {JS_INTERFACE}.onFinish('', {token}); }})(document)"
            ),
            (InjectKind::StyleFile, None) => format!(
                "(function(d) {{ var c = d.createElement('link'); c.rel = 'stylesheet'; c.type = 'text/css'; c.href = \"{MARKER}\"; d.head.appendChild(c); }})(document)"
            ),
            (InjectKind::StyleFile, Some(token)) => format!(
                "(function(d) {{ var c = d.createElement('link'); c.rel = 'stylesheet'; c.type = 'text/css'; c.href = \"{MARKER}\"; d.head.appendChild(c); {JS_INTERFACE}.onFinish('', {token}); }})(document)"
            ),
        };
        Some(wrapper)
    }
}

/// JSON-escape `source` for use inside a double-quoted string literal.
///
/// The result has no surrounding quotes.
pub fn escape_source(source: &str) -> String {
    let quoted = js_string(source);
    quoted[1..quoted.len() - 1].to_string()
}

/// Produce the text to evaluate for `source` and an optional wrapper.
///
/// Without a wrapper the source is executable text and is returned as-is.
/// With one, the escaped source replaces the first [`MARKER`].
pub fn wrap_source(source: &str, wrapper: Option<&str>) -> String {
    match wrapper {
        None => source.to_string(),
        Some(wrapper) => match wrapper.split_once(MARKER) {
            Some((head, tail)) => format!("{head}{}{tail}", escape_source(source)),
            None => {
                tracing::warn!("injection wrapper has no placeholder; evaluating it unchanged");
                wrapper.to_string()
            }
        },
    }
}

fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
