//! Error types and handling for the hub server.
//!
//! This module defines the error types that can occur during server operations,
//! providing clear categorization of different failure modes.

/// Enumeration of possible server errors.
///
/// Categorizes errors into network-related, transport and internal server errors
/// to help with debugging and error handling.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Network-related errors such as binding failures or handshake issues
    #[error("Network error: {0}")]
    Network(String),

    /// A configuration value the server cannot run with
    #[error("Configuration error: {0}")]
    Config(String),

    /// Read or write failure on an established WebSocket
    #[error("Transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// Internal server errors such as the hub control loop having stopped
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures produced while decoding or encoding wire payloads.
///
/// The two decode stages have distinct variants so a bad outer envelope can be
/// told apart from a bad inner payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("Failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),
}
