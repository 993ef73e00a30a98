//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that starts the server,
//! waits for a termination signal and shuts the server down.

use crate::{
    config::AppConfig,
    logging::display_banner,
    signals::{wait_for_shutdown_signal, wait_for_shutdown_signal_silent},
};
use hub_server::GameServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Main application struct.
///
/// # Architecture
///
/// * **Configuration Management**: Holds the validated, merged configuration
/// * **Server Orchestration**: Runs the hub server on a background task
/// * **Graceful Shutdown**: Handles termination signals and cleanup
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Where the configuration came from, for the startup summary
    config_path: PathBuf,
    /// Hub server instance
    server: Arc<GameServer>,
}

impl Application {
    /// Creates a new application from an already merged configuration.
    ///
    /// # Process
    ///
    /// 1. Validate the configuration
    /// 2. Display startup banner
    /// 3. Build the server configuration and server
    pub fn new(config: AppConfig, config_path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        config
            .validate()
            .map_err(|e| format!("Configuration validation failed: {e}"))?;
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        let server = Arc::new(GameServer::new(config.to_server_config()?));
        Ok(Self {
            config,
            config_path,
            server,
        })
    }

    /// Runs the server until a termination signal arrives or the server fails.
    ///
    /// A second signal during shutdown exits the process immediately.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting Hub Server Application");
        self.log_configuration_summary();

        let mut server_handle = {
            let server = self.server.clone();
            tokio::spawn(async move { server.start().await })
        };

        info!("🛑 Press Ctrl+C to gracefully shutdown");

        tokio::select! {
            finished = &mut server_handle => {
                return match finished {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e.into()),
                    Err(e) => Err(format!("Server task failed: {e}").into()),
                };
            }
            signal = wait_for_shutdown_signal() => signal?,
        }

        // merciless shutdown
        tokio::spawn(async move {
            if let Err(e) = wait_for_shutdown_signal_silent().await {
                error!("Failed to set up merciless shutdown signal handler: {e}");
                return;
            }

            warn!("Shutdown handler received again! I'll make this quick.");
            std::process::exit(1);
        });

        info!("🛑 Shutdown signal received, beginning graceful shutdown...");
        self.server.shutdown();

        match tokio::time::timeout(tokio::time::Duration::from_secs(8), server_handle).await {
            Ok(Ok(Ok(()))) => info!("✅ Server task completed gracefully"),
            Ok(Ok(Err(e))) => error!("❌ Server error during shutdown: {}", e),
            Ok(Err(e)) => error!("❌ Server task failed: {}", e),
            Err(_) => warn!("⏰ Server task did not complete within timeout, proceeding"),
        }

        // Give write loops a moment to flush close frames.
        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;

        info!("✅ Hub Server shutdown complete");
        Ok(())
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  📂 Config file: {}", self.config_path.display());
        info!(
            "  🌐 Endpoint: ws://{}{}",
            self.config.server.bind_address, self.config.server.ws_path
        );
        info!(
            "  📬 Queues: {} outbound per session, {} inbound",
            self.config.server.outbound_queue_capacity, self.config.server.inbound_queue_capacity
        );
        info!(
            "  🏷️ Position broadcast ids: {:?}",
            self.config.server.update_id_policy
        );
    }
}
