use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::CheckerConfig;

#[derive(Parser)]
#[command(name = "toxicheck")]
#[command(version)]
#[command(about = "Send text to a toxicity analysis endpoint and show the verdict")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// TOML config file (all keys optional)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis backend, overriding the config file
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Whole-request timeout in seconds (default: none)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Analyze one piece of text and exit (0 safe, 2 toxic, 1 error)
    Check {
        /// Text to analyze; read from stdin when omitted
        text: Vec<String>,

        /// Print the final view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Line-based editor: type text, submit with an empty line or /analyze
    Interactive,
    /// Probe the backend's health endpoint
    Health,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Apply command-line overrides on top of a loaded config.
pub fn apply_overrides(args: &Args, mut config: CheckerConfig) -> CheckerConfig {
    if let Some(url) = &args.url {
        config.base_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = Some(timeout);
    }
    config
}

/// Default `tracing` filter for the verbosity flags; `RUST_LOG` wins over it.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}
