// msgscope - cross-filtered explorer for messaging exports
//
// Loads a messaging export (or the built-in demo archive) and shows linked
// histograms, a date by time-of-day scatter and two brushable density
// strips. Clicking a bar or brushing a strip filters every other view.
//
// Architecture:
// - Ingest: HTML/JSON exports → raw messages; derive: enriched records
// - Crossfilter: one index, one filter per dimension, counts per group
// - Coordinator: user gestures → filters → scene + redraw steps
// - TUI (ratatui): draws the scene; report: prints it headlessly
// - Event system: background loads report back over an mpsc channel

mod cli;
mod config;
mod coordinator;
mod crossfilter;
mod demo;
mod derive;
mod events;
mod ingest;
mod logging;
mod model;
mod registry;
mod report;
mod tui;
mod util;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, InputArgs};
use config::Config;
use coordinator::{Session, Viewport};
use logging::LogBuffer;
use report::Report;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands exit before anything is loaded
    if let Some(command) = &cli.command {
        if cli::handle_config(command) {
            return Ok(());
        }
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    match cli.command {
        Some(Commands::Report { input, json }) => run_report(&config, &input, json).await,
        _ if cli.no_tui || !config.enable_tui => run_report(&config, &cli.input, false).await,
        _ => run_tui(config, &cli.input).await,
    }
}

/// Headless mode: logs go to stderr, the report to stdout
async fn run_report(config: &Config, input: &InputArgs, json: bool) -> Result<()> {
    let _file_guard = logging::init(&config.logging, None);

    let Some(source) = input.source(config.demo_on_start) else {
        bail!("Nothing to load: pass export paths or --demo");
    };
    tracing::info!("Loading {}", source);
    let dataset = events::load(&source, config.time_zone).await?;

    let output = if json {
        Report::build(dataset, config.display.top_n)?.to_json()?
    } else {
        let session = Session::new(dataset, config.display.top_n, Viewport::default())
            .context("Failed to index messages")?;
        report::text(&session)
    };
    println!("{}", output);
    Ok(())
}

/// Interactive mode: logs are captured for the logs panel
async fn run_tui(config: Config, input: &InputArgs) -> Result<()> {
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, Some(log_buffer.clone()));

    tracing::info!("msgscope v{} starting", config::VERSION);
    let source = input.source(config.demo_on_start);
    tui::run(config, source, log_buffer).await
}
