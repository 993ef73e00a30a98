//! Server configuration types and defaults.
//!
//! This module contains the server configuration structure and default values
//! used to initialize and customize the hub server behavior.

use crate::error::ServerError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration structure for the hub server.
///
/// Contains the listener address, the WebSocket upgrade path, queue sizing
/// and the routing choice for position broadcasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The socket address to bind the server to
    pub bind_address: SocketAddr,

    /// HTTP path on which WebSocket upgrades are accepted
    pub ws_path: String,

    /// Capacity of each session's outbound frame queue
    pub outbound_queue_capacity: usize,

    /// Capacity of the hub's inbound event queue
    pub inbound_queue_capacity: usize,

    /// Which id is stamped on each copy of a position broadcast
    pub update_id_policy: UpdateIdPolicy,
}

/// Selects the `id` carried by each copy of an `update` broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateIdPolicy {
    /// Every recipient sees the reporting peer's id.
    #[default]
    Sender,
    /// Each recipient sees its own id.
    Recipient,
}

impl std::str::FromStr for UpdateIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sender" => Ok(Self::Sender),
            "recipient" => Ok(Self::Recipient),
            other => Err(format!(
                "Invalid update id policy: {other}. Must be one of: sender, recipient"
            )),
        }
    }
}

impl ServerConfig {
    /// Checks the values the server cannot run with.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is usable, or `ServerError::Config`
    /// describing the first problem found.
    pub fn validate(&self) -> Result<(), ServerError> {
        if !self.ws_path.starts_with('/') {
            return Err(ServerError::Config(format!(
                "WebSocket path must start with '/': {}",
                self.ws_path
            )));
        }

        // Registration queues a welcome and an initial position.
        if self.outbound_queue_capacity < 2 {
            return Err(ServerError::Config(
                "outbound_queue_capacity must be at least 2".to_string(),
            ));
        }

        if self.inbound_queue_capacity == 0 {
            return Err(ServerError::Config(
                "inbound_queue_capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 2508)),
            ws_path: "/ws".to_string(),
            outbound_queue_capacity: 256,
            inbound_queue_capacity: 1024,
            update_id_policy: UpdateIdPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_id_policy_parsing() {
        assert_eq!("sender".parse::<UpdateIdPolicy>(), Ok(UpdateIdPolicy::Sender));
        assert_eq!("recipient".parse::<UpdateIdPolicy>(), Ok(UpdateIdPolicy::Recipient));
        assert!("everyone".parse::<UpdateIdPolicy>().is_err());
    }

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address.port(), 2508);
        assert_eq!(config.ws_path, "/ws");
        assert_eq!(config.update_id_policy, UpdateIdPolicy::Sender);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_queue_sizes() {
        for outbound in [0, 1] {
            let config = ServerConfig {
                outbound_queue_capacity: outbound,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ServerError::Config(_))));
        }

        let config = ServerConfig {
            outbound_queue_capacity: 2,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = ServerConfig {
            inbound_queue_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_relative_path() {
        let config = ServerConfig {
            ws_path: "ws".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }
}
