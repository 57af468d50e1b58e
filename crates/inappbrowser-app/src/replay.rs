//! JSON-lines replay of bridge calls and page behaviour.
//!
//! Each line is one step:
//!
//! ```text
//! {"op":"exec","action":"open","args":["https://example.com","_blank","location=no"],"callback":"InAppBrowser1"}
//! {"op":"navigate","url":"tel:5551234"}
//! {"op":"finish","message":"[2]","callback":"InAppBrowser2"}
//! {"op":"back"}
//! ```
//!
//! The coordinator runs after every step, so results come out in the order
//! a device would produce them.

use std::io::BufRead;
use std::sync::Arc;

use inappbrowser_common::{Bridge, CallbackContext, IabError, PluginResult, Status};
use inappbrowser_config::BrowserConfig;
use inappbrowser_webview::{
    CommandArgs, Coordinator, Dispatcher, Handled, HeadlessProbe, HeadlessViewFactory, Platform,
    StrategyRegistry, UrlPolicy,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::host::{Output, PrefixAllowList, PrintBridge, PrintLauncher, PrintPrimary, Record};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// A bridge call from script.
    Exec {
        action: String,
        #[serde(default)]
        args: Vec<Value>,
        callback: String,
    },
    /// The page follows a link.
    Navigate { url: String },
    /// Injected code reports completion.
    Finish {
        #[serde(default)]
        message: String,
        callback: String,
    },
    /// A raw IPC body posted by page script.
    Ipc { body: String },
    /// The page fails to load.
    Error {
        code: i32,
        description: String,
        url: String,
    },
    /// The device back button.
    Back,
    /// The platform dismisses the overlay.
    Dismiss,
    ToolbarBack,
    ToolbarForward,
    /// The primary view navigated away.
    Reset,
    Auth { host: String, realm: String },
}

impl Step {
    pub fn parse(line: &str) -> Result<Self, IabError> {
        Ok(serde_json::from_str(line)?)
    }
}

pub struct Replay {
    coordinator: Coordinator,
    dispatcher: Dispatcher,
    views: HeadlessViewFactory,
    bridge: Arc<dyn Bridge>,
    output: Output,
}

impl Replay {
    /// Wire a headless platform that reports everything to `output`.
    ///
    /// An empty `allow` list means the host has no allow-list at all.
    pub fn new(config: BrowserConfig, allow: Vec<String>, output: Output) -> Self {
        let views = HeadlessViewFactory::new();
        let whitelist = (!allow.is_empty())
            .then(|| Arc::new(PrefixAllowList(allow)) as Arc<dyn UrlPolicy>);
        let platform = Platform {
            primary: Box::new(PrintPrimary(output.clone())),
            launcher: Arc::new(PrintLauncher(output.clone())),
            views: Box::new(views.clone()),
            cookies: None,
            whitelist,
            plugin_manager: None,
        };
        let (coordinator, dispatcher) = Coordinator::new(platform, config, StrategyRegistry::new());
        Self {
            coordinator,
            dispatcher,
            views,
            bridge: Arc::new(PrintBridge(output.clone())),
            output,
        }
    }

    /// Apply one step and let the UI thread catch up.
    ///
    /// Bridge calls the dispatcher refuses are answered on their callback
    /// the way the script bridge would answer them.
    pub fn step(&mut self, step: Step) -> Result<(), IabError> {
        debug!(?step, "replay step");
        match step {
            Step::Exec {
                action,
                args,
                callback,
            } => {
                let ctx = CallbackContext::new(callback, Arc::clone(&self.bridge));
                match self
                    .dispatcher
                    .execute(&action, &CommandArgs::new(args), ctx.clone())
                {
                    Ok(Handled::Yes) => {}
                    Ok(Handled::No) => {
                        warn!(action = %action, "action not handled");
                        ctx.send(PluginResult::new(
                            Status::InvalidAction,
                            format!("unknown action: {action}"),
                        ));
                    }
                    Err(IabError::InvalidArgument(reason)) => {
                        warn!(action = %action, %reason, "bridge call rejected");
                        ctx.send(PluginResult::new(Status::Error, reason));
                    }
                    Err(e) => return Err(e),
                }
            }
            Step::Navigate { url } => {
                if let Some(probe) = self.probe() {
                    probe.navigate(&url);
                }
            }
            Step::Finish { message, callback } => {
                if let Some(probe) = self.probe() {
                    probe.complete_script(&message, &callback);
                }
            }
            Step::Ipc { body } => {
                if let Some(probe) = self.probe() {
                    probe.post_message(&body);
                }
            }
            Step::Error {
                code,
                description,
                url,
            } => {
                if let Some(probe) = self.probe() {
                    probe.fail(code, &description, &url);
                }
            }
            Step::Back => {
                if let Some(probe) = self.probe() {
                    probe.back_pressed();
                }
            }
            Step::Dismiss => {
                if let Some(probe) = self.probe() {
                    probe.dismiss();
                }
            }
            Step::ToolbarBack => {
                self.coordinator.go_back();
            }
            Step::ToolbarForward => {
                self.coordinator.go_forward();
            }
            Step::Reset => self.coordinator.on_reset(),
            Step::Auth { host, realm } => {
                let handled = self.coordinator.on_http_auth_request(&host, &realm);
                self.output.emit(&Record::Auth {
                    host: &host,
                    handled,
                });
            }
        }
        self.coordinator.run_pending();
        Ok(())
    }

    /// Replay every line of `input`. Bad lines are logged and skipped.
    pub fn run(&mut self, input: impl BufRead) -> Result<usize, IabError> {
        let mut applied = 0;
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Step::parse(line) {
                Ok(step) => {
                    self.step(step)?;
                    applied += 1;
                }
                Err(e) => warn!(line = index + 1, error = %e, "skipping malformed step"),
            }
        }
        self.coordinator.on_destroy();
        Ok(applied)
    }

    /// The live overlay's probe. Steps aimed at a closed overlay are dropped.
    fn probe(&self) -> Option<HeadlessProbe> {
        if !self.coordinator.has_session() {
            debug!("no overlay open; step ignored");
            return None;
        }
        self.views.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn records(&self) -> Vec<Value> {
            let text = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
            text.lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn replay(allow: Vec<String>) -> (Replay, Buffer) {
        let buffer = Buffer::default();
        let replay = Replay::new(
            BrowserConfig::default(),
            allow,
            Output::new(buffer.clone()),
        );
        (replay, buffer)
    }

    const SESSION: &str = r#"
# open, follow a tel: link, inject, then close
{"op":"exec","action":"open","args":["https://example.com","_blank","location=no"],"callback":"InAppBrowser1"}
{"op":"navigate","url":"tel:5551234"}
{"op":"exec","action":"injectScriptCode","args":["1+1",true],"callback":"InAppBrowser2"}
{"op":"finish","message":"[2]","callback":"InAppBrowser2"}
not json
{"op":"exec","action":"close","args":[],"callback":"InAppBrowser3"}
"#;

    #[test]
    fn replays_a_session() {
        let (mut replay, buffer) = replay(Vec::new());
        let applied = replay.run(SESSION.as_bytes()).unwrap();
        assert_eq!(applied, 5);

        let records = buffer.records();
        let kinds: Vec<String> = records
            .iter()
            .map(|r| match r["kind"].as_str().unwrap() {
                "result" => r["message"]["type"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("result:{}", r["message"])),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "result:\"\"",
                "loadstart",
                "loadstop",
                "launch",
                "result:[2]",
                "exit",
            ]
        );
        assert_eq!(records[3]["intent"]["action"], "dial");
        assert_eq!(records[4]["callbackId"], "InAppBrowser2");
    }

    #[test]
    fn rejected_calls_answer_the_caller_and_replay_continues() {
        let (mut replay, buffer) = replay(Vec::new());
        let script = r#"{"op":"exec","action":"open","args":[],"callback":"InAppBrowser1"}
{"op":"exec","action":"explode","args":[],"callback":"InAppBrowser2"}
{"op":"exec","action":"open","args":["https://example.com","_blank",""],"callback":"InAppBrowser3"}"#;
        let applied = replay.run(script.as_bytes()).unwrap();
        assert_eq!(applied, 3);

        let records = buffer.records();
        assert_eq!(records[0]["callbackId"], "InAppBrowser1");
        assert_eq!(records[0]["status"], "ERROR");
        assert!(records[0]["message"]
            .as_str()
            .unwrap()
            .contains("missing string argument"));

        assert_eq!(records[1]["callbackId"], "InAppBrowser2");
        assert_eq!(records[1]["status"], "INVALID_ACTION");
        assert_eq!(records[1]["code"], 7);

        assert_eq!(records[2]["callbackId"], "InAppBrowser3");
        assert_eq!(records[2]["status"], "OK");
        assert!(records
            .iter()
            .any(|r| r["message"]["type"] == "loadstop" && r["callbackId"] == "InAppBrowser3"));
    }

    #[test]
    fn self_target_respects_the_allow_list() {
        let (mut replay, buffer) = replay(vec!["https://app.example".into()]);
        let script = r#"{"op":"exec","action":"open","args":["https://app.example/x","_self",""],"callback":"InAppBrowser1"}
{"op":"exec","action":"open","args":["https://evil.example","_self",""],"callback":"InAppBrowser2"}"#;
        replay.run(script.as_bytes()).unwrap();

        let records = buffer.records();
        assert_eq!(records[0]["kind"], "primary");
        assert_eq!(records[0]["url"], "https://app.example/x");
        assert!(records.iter().all(|r| r["kind"] != "launch"));
        assert_eq!(records.iter().filter(|r| r["kind"] == "primary").count(), 1);
    }

    #[test]
    fn auth_steps_report_the_answer() {
        let (mut replay, buffer) = replay(Vec::new());
        replay
            .step(Step::Auth {
                host: "example.com".into(),
                realm: "r".into(),
            })
            .unwrap();
        let records = buffer.records();
        assert_eq!(records[0]["kind"], "auth");
        assert_eq!(records[0]["handled"], false);
    }

    #[test]
    fn parses_steps() {
        assert_eq!(
            Step::parse(r#"{"op":"exec","action":"close","callback":"InAppBrowser1"}"#).unwrap(),
            Step::Exec {
                action: "close".into(),
                args: Vec::new(),
                callback: "InAppBrowser1".into(),
            }
        );
        assert_eq!(Step::parse(r#"{"op":"toolbar_back"}"#).unwrap(), Step::ToolbarBack);
        assert_eq!(
            Step::parse(r#"{"op":"finish","callback":"InAppBrowser2"}"#).unwrap(),
            Step::Finish {
                message: String::new(),
                callback: "InAppBrowser2".into(),
            }
        );
        assert!(Step::parse(r#"{"op":"explode"}"#).is_err());
    }
}
