//! Next Steps command-line front end.
//!
//! Loads configuration, wires every crate together and runs one command.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod app;
mod commands;
mod output;

use app::App;
use commands::Cli;
use nextsteps_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(config = %cli.config, env = %cli.env, "Configuration loaded");

    let app = match App::build(config, Arc::new(output::ConsoleNotifier)).await {
        Ok(app) => app,
        Err(e) => {
            output::print_notice(&output::notice_for(&e));
            std::process::exit(1);
        }
    };

    if let Err(e) = cli.execute(&app).await {
        output::print_notice(&output::notice_for(&e));
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
