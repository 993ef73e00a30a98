//! Core hub server implementation.
//!
//! This module contains the main `GameServer` struct, which binds the
//! listener, starts the hub control loop and spawns one handler per
//! accepted connection.

use crate::{
    config::ServerConfig,
    connection::Hub,
    error::ServerError,
    server::handlers::handle_connection,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// The core server structure.
///
/// `GameServer` owns the configuration and the shutdown channel. Each call to
/// [`GameServer::serve`] starts its own hub, so all sessions accepted by one
/// listener share one member set.
pub struct GameServer {
    /// Server configuration settings
    config: ServerConfig,

    /// Shutdown flag; once set it stays set
    shutdown_sender: watch::Sender<bool>,
}

impl GameServer {
    /// Creates a new server with the specified configuration.
    pub fn new(config: ServerConfig) -> Self {
        let (shutdown_sender, _) = watch::channel(false);
        Self {
            config,
            shutdown_sender,
        }
    }

    /// Returns the configuration the server was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until shutdown.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the server stopped cleanly, or a `ServerError` if the
    /// configuration is unusable or the address could not be bound.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.config.validate()?;
        let listener = TcpListener::bind(self.config.bind_address)
            .await
            .map_err(|e| {
                ServerError::Network(format!("Failed to bind {}: {e}", self.config.bind_address))
            })?;
        self.serve(listener).await
    }

    /// Runs the accept loop on an already bound listener.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawn the hub control loop
    /// 2. Accept connections, spawning a handler for each
    /// 3. On shutdown, stop accepting and stop the hub, which closes every
    ///    session's outbound queue and sends each client a close frame
    ///
    /// A shutdown requested before this call makes it return right away.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        self.config.validate()?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Network(format!("Listener has no local address: {e}")))?;
        info!("🚀 Starting hub server on ws://{}{}", local_addr, self.config.ws_path);
        info!(
            "📐 Update ids: {:?} | Outbound queue: {} frames",
            self.config.update_id_policy, self.config.outbound_queue_capacity
        );

        let (hub, hub_handle) = Hub::new(
            self.config.inbound_queue_capacity,
            self.config.update_id_policy,
        );
        let hub_task = tokio::spawn(hub.run());

        let ws_path: Arc<str> = Arc::from(self.config.ws_path.as_str());
        let outbound_capacity = self.config.outbound_queue_capacity;
        let mut shutdown_receiver = self.shutdown_sender.subscribe();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let hub_handle = hub_handle.clone();
                        let ws_path = ws_path.clone();

                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(
                                stream,
                                addr,
                                hub_handle,
                                &ws_path,
                                outbound_capacity,
                            ).await {
                                error!("Connection error from {}: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                },
                _ = shutdown_receiver.wait_for(|stopped| *stopped) => {
                    info!("🛑 Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        info!("🧹 Stopping hub and closing sessions...");
        hub_task.abort();
        Ok(())
    }

    /// Asks every accept loop of this server to stop, including ones not
    /// started yet.
    pub fn shutdown(&self) {
        self.shutdown_sender.send_replace(true);
    }
}
