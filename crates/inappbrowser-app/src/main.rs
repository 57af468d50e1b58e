mod cli;
mod host;
mod replay;

use std::fs::File;
use std::io::{self, BufReader};

use inappbrowser_common::IabError;
use inappbrowser_config::Preferences;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::host::Output;
use crate::replay::Replay;

fn load_preferences(args: &cli::Args) -> (Preferences, Option<String>) {
    let loaded = match &args.config {
        Some(path) => inappbrowser_config::load_from_path(path),
        None => inappbrowser_config::load_default(),
    };
    match loaded {
        Ok(prefs) => (prefs, None),
        Err(e) => (Preferences::default(), Some(e.to_string())),
    }
}

/// Filter directive covering the library crates and this binary's own target.
fn log_directive(level: &str) -> String {
    format!("inappbrowser={level},iab={level}")
}

/// `RUST_LOG` plus every comma-separated part of `directive`. An invalid
/// directive falls back to `info` for both targets.
fn env_filter(directive: &str) -> EnvFilter {
    let parsed = directive
        .split(',')
        .map(str::parse::<Directive>)
        .collect::<Result<Vec<_>, _>>();
    let parts = match parsed {
        Ok(parts) => parts,
        Err(_) => log_directive("info")
            .split(',')
            .filter_map(|part| part.parse().ok())
            .collect(),
    };
    parts
        .into_iter()
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive)
}

fn run(args: cli::Args, prefs: Preferences) -> Result<usize, IabError> {
    let mut replay = Replay::new(prefs.browser, args.allow, Output::stdout());
    match args.script.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            tracing::info!("Replaying {}", path.display());
            replay.run(BufReader::new(File::open(path)?))
        }
        _ => replay.run(io::stdin().lock()),
    }
}

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Preferences pick the log level, so load them before logging is up
    let (prefs, load_error) = load_preferences(&args);

    // Initialize logging
    let default_directive = log_directive(prefs.logging.level.as_str());
    let directive = args.log_level.as_deref().unwrap_or(&default_directive);
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter(directive))
        .init();

    tracing::info!("iab v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        tracing::warn!("Preferences load failed, using defaults: {e}");
    }
    tracing::info!(
        "Strategies: driver={}, internal_plugin={}",
        prefs.browser.driver,
        prefs.browser.internal_plugin
    );

    match run(args, prefs) {
        Ok(steps) => tracing::info!("Replayed {steps} steps"),
        Err(e) => {
            tracing::error!("Replay failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_with(directive: &str, emit: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .with_env_filter(env_filter(directive))
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn default_directive_covers_the_binary() {
        assert_eq!(log_directive("warn"), "inappbrowser=warn,iab=warn");

        let text = captured_with(&log_directive("info"), || {
            tracing::warn!("Preferences load failed, using defaults");
            tracing::debug!("too chatty");
        });
        assert!(text.contains("Preferences load failed"));
        assert!(!text.contains("too chatty"));
    }

    #[test]
    fn invalid_directive_falls_back_to_info() {
        let text = captured_with("iab=loud", || {
            tracing::info!("starting");
        });
        assert!(text.contains("starting"));
    }
}
