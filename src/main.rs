use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use colored::*;
use tracing_subscriber::EnvFilter;

use toxicheck::cli::{apply_overrides, log_filter, Args, Command};
use toxicheck::config::CheckerConfig;
use toxicheck::console;
use toxicheck::error::CheckerError;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(verbose, quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(args: Args) -> Result<ExitCode, CheckerError> {
    let config = apply_overrides(&args, CheckerConfig::load(args.config.as_deref())?);
    config.validate()?;

    match args.command {
        Some(Command::Check { text, json }) => console::run_check(&config, text, json).await,
        Some(Command::Health) => console::run_health(&config).await,
        Some(Command::Completions { shell }) => {
            clap_complete::generate(shell, &mut Args::command(), "toxicheck", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Interactive) | None => console::run_interactive(&config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            eprintln!("{} {}", "error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
