use std::path::PathBuf;

use clap::Parser;

/// iab — replay in-app browser bridge traffic against a headless view.
#[derive(Parser, Debug)]
#[command(name = "iab", version, about)]
pub struct Args {
    /// JSON-lines script to replay. Reads stdin when omitted or `-`.
    pub script: Option<PathBuf>,

    /// Preferences file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// URL prefix the host allow-list accepts. Repeatable.
    #[arg(long = "allow")]
    pub allow: Vec<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
