//! Logging system setup and configuration.
//!
//! Installs the tracing subscriber that every hub and session record goes
//! through, and prints the startup banner.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber for the hub.
///
/// `RUST_LOG` wins over `config.level` when set. Output is JSON when either
/// `json_format` (the `--json-logs` flag) or `config.json_format` is set, and
/// human-readable otherwise. Session and hub records carry their session ids
/// and peer addresses in the message, so no extra fields are added here.
///
/// Fails if a global subscriber is already installed.
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}

/// Displays the startup banner through the logger.
pub fn display_banner() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("╔══════════════════════════════════════════╗");
    info!("║              📡 HUB SERVER 📡            ║");
    info!("║                  v{:<23}║", version);
    info!("║                                          ║");
    info!("║  Real-time position and chat broadcast   ║");
    info!("║  over WebSocket                          ║");
    info!("╚══════════════════════════════════════════╝");
}
