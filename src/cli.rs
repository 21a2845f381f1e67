// CLI module - command-line argument parsing and handlers
//
// `msgscope [PATHS]` opens the explorer. Subcommands:
// - report: print aggregates as text or JSON, no TUI
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --path: Show config file path

use crate::config::{Config, VERSION};
use crate::events::LoadSource;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// msgscope - linked histograms over a messaging export
#[derive(Parser, Debug)]
#[command(name = "msgscope")]
#[command(version = VERSION)]
#[command(about = "Explore a messaging export with cross-filtered histograms", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the report instead of opening the TUI
    #[arg(long)]
    pub no_tui: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where messages come from
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Export files or directories (HTML or JSON, not both)
    pub paths: Vec<PathBuf>,

    /// Use the built-in demo archive
    #[arg(long, conflicts_with = "paths")]
    pub demo: bool,
}

impl InputArgs {
    /// Source to load, falling back to the demo when allowed
    pub fn source(&self, demo_fallback: bool) -> Option<LoadSource> {
        if self.demo {
            Some(LoadSource::Demo)
        } else if !self.paths.is_empty() {
            Some(LoadSource::Paths(self.paths.clone()))
        } else if demo_fallback {
            Some(LoadSource::Demo)
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print histogram and density aggregates
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Handle config commands. Returns true if one was handled (exit after).
pub fn handle_config(command: &Commands) -> bool {
    let Commands::Config { show, reset, path } = command else {
        return false;
    };

    if *path {
        handle_config_path();
    } else if *show {
        handle_config_show();
    } else if *reset {
        handle_config_reset();
    } else {
        println!("Usage: msgscope config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    true
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    if let Some(path) = Config::config_path().filter(|p| p.exists()) {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    match Config::reset() {
        Ok(path) => println!("Config reset to defaults: {}", path.display()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
