//! Message type definitions for client-server communication.
//!
//! Inbound traffic is double-encoded: an [`Envelope`] whose `content` string is
//! itself a JSON payload tagged by a `type` field. Outbound traffic is a single
//! [`ServerFrame`].

use serde::{Deserialize, Serialize};

/// Payload tag for a client login notice.
pub const LOGIN_TYPE: &str = "login";
/// Payload tag for a position report.
pub const UPDATE_TYPE: &str = "update";
/// Payload tag for a chat line.
pub const MESSAGE_TYPE: &str = "message";

/// The outer wrapper produced by a session's read loop.
///
/// ```json
/// { "sender": "0b9e3c1a-...", "content": "{\"type\":\"update\",\"x\":\"10\"}" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Id of the session the frame arrived on
    #[serde(default)]
    pub sender: String,

    /// The raw frame text, decoded again as a [`Payload`]
    #[serde(default)]
    pub content: String,
}

/// Every field an inbound payload may carry, all as strings.
///
/// Clients send coordinates as strings; a field of any other JSON type makes
/// the whole payload malformed.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawPayload {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub momentum: String,
    #[serde(default)]
    pub angle: String,
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub message: String,
}

/// A decoded inner payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Login,
    Update(LocationInfo),
    Message(ChatInfo),
    /// A well-formed payload whose `type` the hub does not route
    Unrecognized(String),
}

/// Position state of one player.
///
/// The same shape is used for inbound reports and outbound broadcasts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationInfo {
    pub id: String,
    pub momentum: String,
    pub angle: String,
    pub x: String,
    pub y: String,
    pub name: String,
    pub sex: String,
    pub icon: String,
}

impl LocationInfo {
    /// The position every newly registered session is told about.
    pub fn initial(id: &str) -> Self {
        Self {
            id: id.to_string(),
            momentum: "0.036".to_string(),
            angle: "3.063".to_string(),
            x: "0".to_string(),
            y: "0".to_string(),
            name: id.to_string(),
            sex: "-1".to_string(),
            icon: String::new(),
        }
    }

    /// Copy of this report labelled with a different id.
    pub fn with_id(&self, id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..self.clone()
        }
    }
}

/// A chat line as relayed to every member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatInfo {
    pub id: String,
    pub message: String,
}

/// A frame sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// First frame a session receives, carrying its assigned id
    Welcome { id: String },
    /// Position broadcast
    Update(LocationInfo),
    /// Chat re-broadcast
    Message(ChatInfo),
    /// Offline notice for a departed session
    Closed { id: String },
}
