//! `skycard` — a single-screen terminal weather card.
//!
//! Type a location, press Enter, and the card shows current conditions from
//! OpenWeatherMap: temperature, condition icon, and a row of auxiliary
//! metrics (visibility, feels-like, humidity, wind). Esc or Ctrl-C quits.
//!
//! Logs are written to a file (default `/tmp/skycard.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hook, app launch.

mod app;
mod event;
mod icon;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use skycard_core::{Config, OpenWeatherProvider, WeatherProvider};

use crate::app::App;

/// Terminal weather card: type a location, get current conditions.
#[derive(Parser, Debug)]
#[command(name = "skycard", version, about)]
struct Cli {
    /// Location fetched on startup (falls back to the config file, then "Vienna").
    #[arg(short, long)]
    location: Option<String>,

    /// OpenWeatherMap API key (overrides the config file).
    #[arg(short = 'k', long, env = "OPENWEATHER_API_KEY")]
    api_key: Option<String>,

    /// Log file path (defaults to /tmp/skycard.log)
    #[arg(long, default_value = "/tmp/skycard.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("skycard_tui={log_level},skycard_core={log_level}"))
    });

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("skycard.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);
    tui::install_panic_hook();

    let config = Config::load()?;
    let api_key = config.resolve_api_key(cli.api_key.as_deref())?;
    let initial_location = config.initial_location(cli.location.as_deref());

    let provider: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherProvider::with_base_url(
        api_key,
        config.base_url().to_string(),
    ));

    info!(location = %initial_location, "starting skycard");

    let terminal = tui::Tui::new()?;
    let mut app = App::new(provider, initial_location);
    app.run(terminal).await
}
