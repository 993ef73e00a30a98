//! Factory helpers for creating server instances.

use crate::{config::ServerConfig, server::GameServer};

/// Creates a new server with default configuration.
///
/// # Example
///
/// ```rust
/// use hub_server::create_server;
///
/// let server = create_server();
/// assert_eq!(server.config().ws_path, "/ws");
/// ```
pub fn create_server() -> GameServer {
    GameServer::new(ServerConfig::default())
}

/// Creates a new server with custom configuration.
///
/// # Example
///
/// ```rust
/// use hub_server::{create_server_with_config, ServerConfig, UpdateIdPolicy};
///
/// let config = ServerConfig {
///     bind_address: "127.0.0.1:9000".parse().unwrap(),
///     update_id_policy: UpdateIdPolicy::Recipient,
///     ..Default::default()
/// };
///
/// let server = create_server_with_config(config);
/// ```
pub fn create_server_with_config(config: ServerConfig) -> GameServer {
    GameServer::new(config)
}
