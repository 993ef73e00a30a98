//! # Hub Server - Main Entry Point
//!
//! Real-time WebSocket broadcast hub for multiplayer sessions. This entry point
//! handles CLI parsing, configuration loading, logging and application lifecycle.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (ws://0.0.0.0:2508/ws)
//! hub
//!
//! # Specify custom configuration
//! hub --config production.toml
//!
//! # Override specific settings
//! hub --bind 127.0.0.1:9000 --path /game --log-level debug
//!
//! # Label every position broadcast with the receiving client's id
//! hub --update-ids recipient
//!
//! # JSON logging for production
//! hub --json-logs
//! ```
//!
//! ## Configuration
//!
//! The server loads configuration from a TOML file (default: `config.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! The server handles graceful shutdown on:
//! - SIGINT (Ctrl+C)
//! - SIGTERM (Unix systems)

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;
mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Runs the hub server application.
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_else(|e| {
            eprintln!("⚠️ Failed to load {}: {e}. Using defaults.", args.config_path.display());
            AppConfig::default()
        });

    if let Err(e) = config.apply_cli_overrides(&args) {
        eprintln!("❌ Invalid command line: {e}");
        std::process::exit(1);
    }

    // Setup logging before anything else
    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(config, args.config_path.clone()) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

// Re-export main types for potential library usage
pub use config::{LoggingSettings, ServerSettings};
