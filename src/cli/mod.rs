//! Command-line interface.

pub mod commands;
pub mod display;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(name = "patterns")]
#[command(about = "Fix-pattern candidate lifecycle tooling", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .patterns/config.yaml)
    #[arg(short, long, global = true, env = "PATTERNS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines event log through the lifecycle reducer
    Replay(commands::replay::ReplayArgs),
    /// Compare two diff files by normalized edit similarity
    Similarity(commands::similarity::SimilarityArgs),
    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Load and validate the configuration this invocation points at.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(),
        }
    }
}

/// Report a command failure and exit with status 1.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
