//! Terminal front end: paints the [`View`] and drives the controller from
//! command-line input.

use std::process::ExitCode;

use colored::*;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::debug;

use crate::config::CheckerConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher, HttpBackend};
use crate::error::CheckerError;
use crate::tracker::InputTracker;
use crate::view::{CharCounter, CounterEmphasis, Tone, View, ViewEvent, ViewState};
use crate::{AnalysisController, UiEvent};

// ---------------------------------------------------------------------------
// Painting
// ---------------------------------------------------------------------------

pub fn paint_counter(counter: CharCounter, max_chars: usize) -> String {
    let text = format!("{}/{} characters", counter.count, max_chars);
    match counter.emphasis {
        CounterEmphasis::Normal => text.dimmed().to_string(),
        CounterEmphasis::Warning => text.truecolor(225, 112, 85).bold().to_string(),
    }
}

pub fn loading_line() -> String {
    "⏳ Analyzing text...".bright_blue().to_string()
}

/// Paint whichever panel is visible. Idle paints nothing.
pub fn paint(view: &View) -> String {
    match view.state() {
        ViewState::Idle => String::new(),
        ViewState::Loading => loading_line(),
        ViewState::Error => {
            let message = view.error_message().unwrap_or_default();
            format!("{} {}", "✖".bright_red().bold(), message.bright_red())
        }
        ViewState::ResultsSafe | ViewState::ResultsToxic => {
            let Some(panel) = view.results() else {
                return String::new();
            };
            let title = match panel.tone {
                Tone::Safe => panel.title.bright_green().bold(),
                Tone::Toxic => panel.title.bright_red().bold(),
            };
            let mut out = format!("{} {}\n", panel.icon, title);
            out.push_str(&"=".repeat(50).bright_blue().to_string());
            for row in &panel.details {
                out.push('\n');
                out.push_str(&format!(
                    "  {:<22}{}",
                    format!("{}:", row.label).bright_yellow(),
                    row.value.bold()
                ));
            }
            out
        }
    }
}

/// Exit status for a finished `check`: 0 safe, 2 toxic, 1 anything else.
pub fn exit_status(outcome: Option<&DispatchOutcome>) -> u8 {
    match outcome {
        Some(DispatchOutcome::Safe) => 0,
        Some(DispatchOutcome::Toxic) => 2,
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// Interactive line commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    Append(String),
    Analyze,
    Clear,
    Quit,
    Help,
}

/// Classify one line typed in interactive mode.
///
/// A blank line submits, like pressing the trigger.
pub fn parse_line(line: &str) -> LineCommand {
    let trimmed = line.trim();
    match trimmed {
        "" | "/analyze" => LineCommand::Analyze,
        "/clear" => LineCommand::Clear,
        "/quit" | "/exit" => LineCommand::Quit,
        "/help" => LineCommand::Help,
        _ => LineCommand::Append(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

const HELP: &str = "Type text line by line. Submit with an empty line or /analyze.\n\
Commands: /clear  /quit  /help";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn build_controller(
    config: &CheckerConfig,
    view: View,
) -> Result<AnalysisController<HttpBackend>, CheckerError> {
    let backend = HttpBackend::from_config(config)?;
    debug!(url = backend.analyze_url(), "analysis backend ready");
    Ok(AnalysisController::new(
        view,
        InputTracker::new(config.soft_limit),
        Dispatcher::new(backend),
    ))
}

/// One-shot analysis. With no `text`, the input is read from stdin.
pub async fn run_check(
    config: &CheckerConfig,
    text: Vec<String>,
    json: bool,
) -> Result<ExitCode, CheckerError> {
    let input = if text.is_empty() {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        text.join(" ")
    };

    let mut controller = build_controller(config, View::new())?;
    controller.handle(UiEvent::Edit(input)).await;
    let outcome = controller.handle(UiEvent::Click).await;

    let view = controller.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view.snapshot())?);
    } else {
        println!("{}", paint_counter(view.counter(), config.max_chars));
        println!("{}", paint(view));
    }
    Ok(ExitCode::from(exit_status(outcome.as_ref())))
}

pub async fn run_interactive(config: &CheckerConfig) -> Result<ExitCode, CheckerError> {
    let mut view = View::new();
    view.subscribe(|event| {
        if let ViewEvent::StateChanged {
            to: ViewState::Loading,
            ..
        } = event
        {
            eprintln!("{}", loading_line());
        }
    });
    let mut controller = build_controller(config, view)?;

    println!("{}", "TOXICITY CHECK".bright_cyan().bold());
    println!("{}: {}", "Endpoint".bright_yellow(), config.analyze_url());
    println!("{}", HELP.dimmed());
    println!("{}", "=".repeat(50).bright_blue());

    let mut buffer = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            LineCommand::Append(text) => {
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&text);
                controller.handle(UiEvent::Edit(buffer.clone())).await;
                println!(
                    "{}",
                    paint_counter(controller.view().counter(), config.max_chars)
                );
            }
            LineCommand::Analyze => {
                controller.handle(UiEvent::Click).await;
                println!("{}", paint(controller.view()));
            }
            LineCommand::Clear => {
                buffer.clear();
                controller.handle(UiEvent::Edit(String::new())).await;
                println!(
                    "{}",
                    paint_counter(controller.view().counter(), config.max_chars)
                );
            }
            LineCommand::Help => println!("{}", HELP),
            LineCommand::Quit => break,
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn run_health(config: &CheckerConfig) -> Result<ExitCode, CheckerError> {
    let backend = HttpBackend::from_config(config)?;
    let status = backend.health().await?;
    if status.is_healthy() {
        println!("{} {}", "✅".bright_green(), status.status.bright_green());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} {}", "⚠️".bright_yellow(), status.status.bright_yellow());
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{DetailRow, ResultsPanel};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_parse_line_commands() {
        assert_eq!(parse_line(""), LineCommand::Analyze);
        assert_eq!(parse_line("   "), LineCommand::Analyze);
        assert_eq!(parse_line("/analyze"), LineCommand::Analyze);
        assert_eq!(parse_line("/clear"), LineCommand::Clear);
        assert_eq!(parse_line("/quit"), LineCommand::Quit);
        assert_eq!(parse_line("/exit"), LineCommand::Quit);
        assert_eq!(parse_line("/help"), LineCommand::Help);
    }

    #[test]
    fn test_parse_line_keeps_leading_whitespace() {
        assert_eq!(
            parse_line("  indented text\r"),
            LineCommand::Append("  indented text".to_string())
        );
    }

    #[test]
    fn test_paint_counter_plain() {
        plain();
        let counter = CharCounter {
            count: 12,
            emphasis: CounterEmphasis::Normal,
        };
        assert_eq!(paint_counter(counter, 1000), "12/1000 characters");
    }

    #[test]
    fn test_paint_idle_is_empty() {
        assert_eq!(paint(&View::new()), "");
    }

    #[test]
    fn test_paint_error() {
        plain();
        let mut view = View::new();
        view.show_error("bad request");
        assert_eq!(paint(&view), "✖ bad request");
    }

    #[test]
    fn test_paint_results_rows() {
        plain();
        let mut view = View::new();
        view.show_results(ResultsPanel {
            tone: Tone::Toxic,
            icon: "⚠️",
            title: "Toxic Content Detected (High Risk)".to_string(),
            details: vec![DetailRow {
                label: "Toxicity Score",
                value: "0.82/1.0".to_string(),
            }],
        });
        let out = paint(&view);
        assert!(out.starts_with("⚠️ Toxic Content Detected (High Risk)"));
        assert!(out.contains("Toxicity Score:"));
        assert!(out.contains("0.82/1.0"));
    }

    #[test]
    fn test_paint_loading() {
        plain();
        let mut view = View::new();
        view.show_loading();
        assert!(paint(&view).contains("Analyzing"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_status(Some(&DispatchOutcome::Safe)), 0);
        assert_eq!(exit_status(Some(&DispatchOutcome::Toxic)), 2);
        assert_eq!(exit_status(None), 1);
        assert_eq!(
            exit_status(Some(&DispatchOutcome::Failed(
                crate::error::DispatchError::Transport
            ))),
            1
        );
    }
}
