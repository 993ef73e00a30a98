//! Configuration management for the hub server.
//!
//! This module handles loading, validation, and conversion of server configuration
//! from TOML files and command-line arguments.

use crate::cli::CliArgs;
use hub_server::{ServerConfig, UpdateIdPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server-specific configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Network address to bind the server to (e.g., "0.0.0.0:2508")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// HTTP path on which WebSocket upgrades are accepted
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
    /// Frames that may wait for one slow client before new ones are dropped
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
    /// Events that may wait for the hub control loop
    #[serde(default = "default_inbound_queue_capacity")]
    pub inbound_queue_capacity: usize,
    /// Id stamped on position broadcasts ("sender" or "recipient")
    #[serde(default)]
    pub update_id_policy: UpdateIdPolicy,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

fn default_bind_address() -> String {
    "0.0.0.0:2508".to_string()
}

fn default_ws_path() -> String {
    "/ws".to_string()
}

fn default_outbound_queue_capacity() -> usize {
    256
}

fn default_inbound_queue_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            ws_path: default_ws_path(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
            inbound_queue_capacity: default_inbound_queue_capacity(),
            update_id_policy: UpdateIdPolicy::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, a default configuration file is written
    /// to that path and the defaults are returned.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies command-line overrides on top of the file settings.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<(), String> {
        if let Some(bind_address) = &args.bind_address {
            self.server.bind_address = bind_address.clone();
        }
        if let Some(ws_path) = &args.ws_path {
            self.server.ws_path = ws_path.clone();
        }
        if let Some(log_level) = &args.log_level {
            self.logging.level = log_level.clone();
        }
        if args.json_logs {
            self.logging.json_format = true;
        }
        if let Some(policy) = &args.update_ids {
            self.server.update_id_policy = policy.parse()?;
        }
        Ok(())
    }

    /// Converts the application settings into a [`ServerConfig`].
    pub fn to_server_config(&self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        Ok(ServerConfig {
            bind_address: self.server.bind_address.parse()?,
            ws_path: self.server.ws_path.clone(),
            outbound_queue_capacity: self.server.outbound_queue_capacity,
            inbound_queue_capacity: self.server.inbound_queue_capacity,
            update_id_policy: self.server.update_id_policy,
        })
    }

    /// Validates the configuration settings.
    ///
    /// Server values are checked by [`ServerConfig::validate`], so the file,
    /// the CLI and a directly constructed server all share one set of rules.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error message describing
    /// the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let server_config = self
            .to_server_config()
            .map_err(|_| format!("Invalid bind address: {}", &self.server.bind_address))?;
        server_config.validate().map_err(|e| e.to_string())?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args() -> CliArgs {
        CliArgs {
            config_path: PathBuf::from("config.toml"),
            bind_address: None,
            ws_path: None,
            log_level: None,
            json_logs: false,
            update_ids: None,
        }
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:2508");
        assert_eq!(config.server.ws_path, "/ws");
        assert_eq!(config.server.outbound_queue_capacity, 256);
        assert_eq!(config.server.update_id_policy, UpdateIdPolicy::Sender);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file_creates_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from_file(&path)
            .await
            .expect("Loading a missing file should succeed");
        assert!(path.exists());
        assert_eq!(config.server.bind_address, "0.0.0.0:2508");

        let reloaded = AppConfig::load_from_file(&path)
            .await
            .expect("Reloading the generated file should succeed");
        assert_eq!(reloaded.server.ws_path, config.server.ws_path);
    }

    #[tokio::test]
    async fn test_load_from_existing_file_with_partial_settings() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("hub.toml");
        tokio::fs::write(
            &path,
            r#"
[server]
bind_address = "127.0.0.1:9100"
update_id_policy = "recipient"

[logging]
json_format = true
"#,
        )
        .await
        .expect("Failed to write config");

        let config = AppConfig::load_from_file(&path).await.expect("valid config");
        assert_eq!(config.server.bind_address, "127.0.0.1:9100");
        assert_eq!(config.server.update_id_policy, UpdateIdPolicy::Recipient);
        assert_eq!(config.server.ws_path, "/ws");
        assert_eq!(config.server.inbound_queue_capacity, 1024);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("broken.toml");
        tokio::fs::write(&path, "[server\nbind_address = ")
            .await
            .expect("Failed to write config");

        assert!(AppConfig::load_from_file(&path).await.is_err());
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            bind_address: Some("127.0.0.1:9000".to_string()),
            ws_path: Some("/game".to_string()),
            log_level: Some("debug".to_string()),
            json_logs: true,
            update_ids: Some("recipient".to_string()),
            ..args()
        };

        config.apply_cli_overrides(&args).expect("valid overrides");
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.server.ws_path, "/game");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.server.update_id_policy, UpdateIdPolicy::Recipient);
    }

    #[test]
    fn test_to_server_config_conversion() {
        let mut config = AppConfig::default();
        config.server.bind_address = "127.0.0.1:7000".to_string();
        config.server.outbound_queue_capacity = 8;

        let server_config = config.to_server_config().expect("valid config converts");
        assert_eq!(server_config.bind_address.port(), 7000);
        assert_eq!(server_config.ws_path, "/ws");
        assert_eq!(server_config.outbound_queue_capacity, 8);
        assert_eq!(server_config.inbound_queue_capacity, 1024);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.server.bind_address = "invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.ws_path = "ws".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.outbound_queue_capacity = 1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.inbound_queue_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_reports_server_config_errors() {
        let mut config = AppConfig::default();
        config.server.outbound_queue_capacity = 0;

        let err = config.validate().expect_err("capacity 0 is unusable");
        assert!(err.contains("outbound_queue_capacity"), "unexpected error: {err}");
    }

    #[test]
    fn test_validation_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "level {level} should be valid");
        }
    }
}
