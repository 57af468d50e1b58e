//! Command dispatch from the script bridge.
//!
//! The bridge may call [`Dispatcher::execute`] from any thread. Commands are
//! parsed there and queued for the UI thread, where the
//! [`Coordinator`](crate::coordinator::Coordinator) applies them.

use inappbrowser_common::{CallbackContext, IabError, Result};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::features::NULL;
use crate::inject::InjectKind;

pub const SELF: &str = "_self";
pub const SYSTEM: &str = "_system";
pub const BLANK: &str = "_blank";

/// Where `open` should show a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The host's primary web view.
    SelfView,
    /// An external application.
    System,
    /// The overlay browser.
    Blank,
}

impl Target {
    /// Empty or `"null"` means `_self`; unknown names mean `_blank`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | NULL | SELF => Target::SelfView,
            SYSTEM => Target::System,
            _ => Target::Blank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open {
        url: String,
        target: Target,
        features: String,
    },
    Close,
    Inject {
        kind: InjectKind,
        source: String,
        wants_result: bool,
    },
    Show,
}

impl Command {
    /// Parse a bridge action. Returns `Ok(None)` for unknown actions.
    pub fn parse(action: &str, args: &CommandArgs) -> Result<Option<Self>> {
        let inject = |kind| -> Result<Option<Self>> {
            Ok(Some(Command::Inject {
                kind,
                source: args.string(0)?,
                wants_result: args.boolean(1)?,
            }))
        };

        match action {
            "open" => Ok(Some(Command::Open {
                url: args.string(0)?,
                target: Target::parse(&args.opt_string(1)),
                features: args.opt_string(2),
            })),
            "close" => Ok(Some(Command::Close)),
            "injectScriptCode" => inject(InjectKind::ScriptCode),
            "injectScriptFile" => inject(InjectKind::ScriptFile),
            "injectStyleCode" => inject(InjectKind::StyleCode),
            "injectStyleFile" => inject(InjectKind::StyleFile),
            "show" => Ok(Some(Command::Show)),
            _ => Ok(None),
        }
    }
}

/// Positional arguments of a bridge call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs(Vec<Value>);

impl CommandArgs {
    pub fn new(args: Vec<Value>) -> Self {
        Self(args)
    }

    /// Parse the JSON array the bridge transmits.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(raw)?))
    }

    /// Required string argument.
    pub fn string(&self, index: usize) -> Result<String> {
        match self.0.get(index) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Err(IabError::InvalidArgument(format!(
                "missing string argument at {index}"
            ))),
            Some(other) => Ok(other.to_string()),
        }
    }

    /// Optional string argument: `""` when absent, `"null"` when null.
    pub fn opt_string(&self, index: usize) -> String {
        match self.0.get(index) {
            None => String::new(),
            Some(Value::Null) => NULL.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Required boolean argument. Accepts `"true"`/`"false"` strings.
    pub fn boolean(&self, index: usize) -> Result<bool> {
        match self.0.get(index) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(IabError::InvalidArgument(format!(
                "expected boolean argument at {index}"
            ))),
        }
    }
}

/// Whether the dispatcher recognized the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    /// Unknown action; the bridge reports an error to the caller.
    No,
}

/// Work queued for the UI thread.
#[derive(Debug)]
pub(crate) enum UiTask {
    Command {
        command: Command,
        callback: CallbackContext,
    },
}

/// Thread-safe front door for bridge commands.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tasks: mpsc::UnboundedSender<UiTask>,
}

impl Dispatcher {
    pub(crate) fn new(tasks: mpsc::UnboundedSender<UiTask>) -> Self {
        Self { tasks }
    }

    /// Execute a bridge action.
    ///
    /// Never touches views directly; everything visible happens when the UI
    /// thread next runs the coordinator.
    pub fn execute(
        &self,
        action: &str,
        args: &CommandArgs,
        callback: CallbackContext,
    ) -> Result<Handled> {
        let Some(command) = Command::parse(action, args)? else {
            debug!(action = %action, "unhandled action");
            return Ok(Handled::No);
        };

        debug!(action = %action, callback_id = %callback.callback_id(), "queueing command");
        self.tasks
            .send(UiTask::Command { command, callback })
            .map_err(|_| IabError::UiThreadGone)?;
        Ok(Handled::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> CommandArgs {
        match value {
            Value::Array(items) => CommandArgs::new(items),
            _ => panic!("args must be an array"),
        }
    }

    #[test]
    fn target_normalization() {
        assert_eq!(Target::parse(""), Target::SelfView);
        assert_eq!(Target::parse("null"), Target::SelfView);
        assert_eq!(Target::parse("_self"), Target::SelfView);
        assert_eq!(Target::parse("_system"), Target::System);
        assert_eq!(Target::parse("_blank"), Target::Blank);
        assert_eq!(Target::parse("_top"), Target::Blank);
    }

    #[test]
    fn parses_open() {
        let cmd = Command::parse(
            "open",
            &args(json!(["https://example.com", "_blank", "location=no"])),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Some(Command::Open {
                url: "https://example.com".into(),
                target: Target::Blank,
                features: "location=no".into(),
            })
        );
    }

    #[test]
    fn open_with_null_target_and_features() {
        let cmd = Command::parse("open", &args(json!(["https://a", null, null])))
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd,
            Command::Open {
                url: "https://a".into(),
                target: Target::SelfView,
                features: "null".into(),
            }
        );
    }

    #[test]
    fn open_without_url_is_invalid() {
        let err = Command::parse("open", &CommandArgs::default()).unwrap_err();
        assert!(matches!(err, IabError::InvalidArgument(_)));
    }

    #[test]
    fn parses_injections() {
        let cmd = Command::parse("injectStyleFile", &args(json!(["a.css", false])))
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd,
            Command::Inject {
                kind: InjectKind::StyleFile,
                source: "a.css".into(),
                wants_result: false,
            }
        );

        let cmd = Command::parse("injectScriptCode", &args(json!(["1+1", "true"])))
            .unwrap()
            .unwrap();
        assert!(matches!(cmd, Command::Inject { wants_result: true, .. }));
    }

    #[test]
    fn unknown_action_is_not_handled() {
        assert_eq!(Command::parse("reload", &CommandArgs::default()).unwrap(), None);
    }

    #[test]
    fn args_from_json() {
        let parsed = CommandArgs::from_json(r#"["x", true]"#).unwrap();
        assert_eq!(parsed.string(0).unwrap(), "x");
        assert!(parsed.boolean(1).unwrap());
        assert!(parsed.boolean(2).is_err());
        assert_eq!(parsed.opt_string(5), "");
        assert!(CommandArgs::from_json("{").is_err());
    }
}
