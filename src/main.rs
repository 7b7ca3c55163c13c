//! Patterns CLI entry point.

use clap::Parser;

use patterns::cli::{commands, handle_error, Cli, Commands};
use patterns::infrastructure::logging::{LogConfig, LoggerImpl};

fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => handle_error(&err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, cli.json),
    };

    let result = match &cli.command {
        Commands::Replay(args) => commands::replay::execute(args, &config, cli.json),
        Commands::Similarity(args) => commands::similarity::execute(args, cli.json),
        Commands::Config => commands::config::execute(&config, cli.json),
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
