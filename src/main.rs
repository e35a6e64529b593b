//! seekterm - Terminal client for a locally hosted AgenticSeek backend

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seekterm::app;
use seekterm::types::config::{self, Config};

#[derive(Parser, Debug)]
#[command(name = "seekterm")]
#[command(about = "seekterm - Terminal chat client for a local AgenticSeek backend")]
#[command(version)]
struct Args {
    /// Query to start with.
    /// Starts interactive mode with this query pre-submitted.
    #[arg(value_name = "PROMPT")]
    prompt: Option<String>,

    /// Print mode: send the query, print the answer, then exit (non-interactive).
    #[arg(short = 'p', long)]
    print: bool,

    /// Base URL of the backend
    #[arg(long, env = config::BACKEND_URL_ENV, default_value = config::DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Interval between polls (e.g. "3s", "500ms")
    #[arg(long, env = "SEEKTERM_POLL_INTERVAL", default_value = "3s", value_parser = parse_duration)]
    poll_interval: Duration,

    /// Timeout for health, answer, screenshot and stop requests
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    timeout: Duration,

    /// In print mode, also print the agent's reasoning
    #[arg(long)]
    show_reasoning: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(value).map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "info" };

    if args.print {
        // Print mode: logs go to stderr so stdout carries only the answer
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| filter.into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        // TUI mode uses the alternate screen, so logs go to a file
        let log_path = std::env::temp_dir().join("seekterm.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| filter.into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();

        if args.debug {
            eprintln!("Debug logs written to: {}", log_path.display());
        }
    }

    let mut config = Config::default()
        .with_backend_url(&args.backend_url)?
        .with_poll_interval(args.poll_interval)
        .with_request_timeout(args.timeout);
    config.print_mode = args.print;
    config.show_reasoning = args.show_reasoning;
    config.initial_prompt = args.prompt;

    if config.print_mode {
        if config.initial_prompt.is_none() {
            eprintln!("Error: --print requires a prompt argument");
            std::process::exit(1);
        }
        return app::run_print(&config).await;
    }

    app::run(config).await
}
