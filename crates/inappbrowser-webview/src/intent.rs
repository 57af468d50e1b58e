//! Hand-off of URLs to external applications.
//!
//! An [`Intent`] describes what the platform should launch; the
//! [`ExternalLauncher`] collaborator resolves and starts it. Failures never
//! reach the caller of a navigation: [`handoff`] logs them and reports
//! whether the launch happened.

use std::path::Path;

use inappbrowser_common::HandoffError;
use serde::Serialize;
use tracing::{debug, error};

pub const SCHEME_TEL: &str = "tel:";
pub const SCHEME_SMS: &str = "sms:";
pub const SCHEME_MAILTO: &str = "mailto:";
pub const SCHEME_GEO: &str = "geo:";
pub const SCHEME_MARKET: &str = "market:";
pub const SCHEME_JAVASCRIPT: &str = "javascript:";

pub const EXTRA_APPLICATION_ID: &str = "com.android.browser.application_id";
pub const EXTRA_SMS_BODY: &str = "sms_body";
pub const EXTRA_ADDRESS: &str = "address";
pub const SMS_MIME_TYPE: &str = "vnd.android-dir/mms-sms";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentAction {
    Dial,
    View,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub action: IntentAction,
    pub data: String,
    pub mime_type: Option<String>,
    pub extras: Vec<(String, String)>,
}

impl Intent {
    fn new(action: IntentAction, data: impl Into<String>) -> Self {
        Self {
            action,
            data: data.into(),
            mime_type: None,
            extras: Vec::new(),
        }
    }

    /// Open the dialer pre-filled with a `tel:` URL.
    pub fn dial(url: &str) -> Self {
        Self::new(IntentAction::Dial, url)
    }

    /// Let whichever application claims the URL handle it.
    pub fn view(url: &str) -> Self {
        Self::new(IntentAction::View, url)
    }

    /// Compose an SMS from `sms:<address>[?body=<text>]`.
    pub fn sms(url: &str) -> Self {
        let rest = url.strip_prefix(SCHEME_SMS).unwrap_or(url);
        let (address, query) = match rest.split_once('?') {
            Some((address, query)) => (address, Some(query)),
            None => (rest, None),
        };

        let mut intent = Self::new(IntentAction::View, format!("{SCHEME_SMS}{address}"));
        if let Some(body) = query.and_then(|q| q.strip_prefix("body=")) {
            let body = urlencoding::decode(body)
                .map(|b| b.into_owned())
                .unwrap_or_else(|_| body.to_string());
            intent.extras.push((EXTRA_SMS_BODY.into(), body));
        }
        intent.extras.push((EXTRA_ADDRESS.into(), address.to_string()));
        intent.mime_type = Some(SMS_MIME_TYPE.into());
        intent
    }

    /// Open a URL in the system browser (the `_system` target).
    ///
    /// Only `file:` URLs carry a MIME type; activity resolution fails for
    /// them without one, while web URLs must not have one or downloads break.
    pub fn system(url: &str, application_id: &str) -> Self {
        let mut intent = Self::view(url);
        if scheme(url).is_some_and(|s| s.eq_ignore_ascii_case("file")) {
            intent.mime_type = Some(mime_from_url(url).to_string());
        }
        intent
            .extras
            .push((EXTRA_APPLICATION_ID.into(), application_id.to_string()));
        intent
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Starts external activities on behalf of the browser.
pub trait ExternalLauncher: Send + Sync {
    fn launch(&self, intent: &Intent) -> Result<(), HandoffError>;
}

/// Launch `intent`, logging instead of propagating a failure.
pub fn handoff(launcher: &dyn ExternalLauncher, intent: &Intent) -> bool {
    match launcher.launch(intent) {
        Ok(()) => {
            debug!(action = ?intent.action, data = %intent.data, "handed off to external app");
            true
        }
        Err(e) => {
            error!(action = ?intent.action, data = %intent.data, error = %e, "external hand-off failed");
            false
        }
    }
}

/// The scheme of a URL, without the trailing colon.
pub fn scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once(':')?;
    let valid = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Guess a MIME type from the path component of a URL.
fn mime_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    mime_from_extension(Path::new(path))
}

/// Guess MIME type from file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        Some("zip") => "application/zip",
        Some("apk") => "application/vnd.android.package-archive",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_extraction() {
        assert_eq!(scheme("https://example.com"), Some("https"));
        assert_eq!(scheme("tel:5551234"), Some("tel"));
        assert_eq!(scheme("file:///sdcard/a.pdf"), Some("file"));
        assert_eq!(scheme("no-scheme-here"), None);
        assert_eq!(scheme(":empty"), None);
        assert_eq!(scheme("1http://x"), None);
    }

    #[test]
    fn sms_without_query() {
        let intent = Intent::sms("sms:5551212");
        assert_eq!(intent.data, "sms:5551212");
        assert_eq!(intent.extra(EXTRA_ADDRESS), Some("5551212"));
        assert_eq!(intent.extra(EXTRA_SMS_BODY), None);
        assert_eq!(intent.mime_type.as_deref(), Some(SMS_MIME_TYPE));
    }

    #[test]
    fn sms_with_body() {
        let intent = Intent::sms("sms:5551212?body=This%20is%20the%20message");
        assert_eq!(intent.data, "sms:5551212");
        assert_eq!(intent.extra(EXTRA_ADDRESS), Some("5551212"));
        assert_eq!(intent.extra(EXTRA_SMS_BODY), Some("This is the message"));
    }

    #[test]
    fn sms_with_other_query_has_no_body() {
        let intent = Intent::sms("sms:5551212?subject=hi");
        assert_eq!(intent.extra(EXTRA_ADDRESS), Some("5551212"));
        assert_eq!(intent.extra(EXTRA_SMS_BODY), None);
    }

    #[test]
    fn system_file_url_gets_mime_type() {
        let intent = Intent::system("file:///sdcard/Download/report.PDF", "org.example");
        assert_eq!(intent.action, IntentAction::View);
        assert_eq!(intent.mime_type.as_deref(), Some("application/pdf"));
        assert_eq!(intent.extra(EXTRA_APPLICATION_ID), Some("org.example"));
    }

    #[test]
    fn system_web_url_has_no_mime_type() {
        let intent = Intent::system("https://example.com/file.pdf", "org.example");
        assert!(intent.mime_type.is_none());
    }

    #[test]
    fn mime_ignores_query_and_fragment() {
        assert_eq!(mime_from_url("file:///a/b.html?x=1#top"), "text/html");
        assert_eq!(mime_from_url("file:///a/b"), "application/octet-stream");
    }

    struct Refuses;

    impl ExternalLauncher for Refuses {
        fn launch(&self, intent: &Intent) -> Result<(), HandoffError> {
            Err(HandoffError::NoHandler(intent.data.clone()))
        }
    }

    #[test]
    fn handoff_swallows_failures() {
        assert!(!handoff(&Refuses, &Intent::dial("tel:1")));
    }
}
