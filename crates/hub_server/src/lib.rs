//! # Hub Server - Real-Time Broadcast Hub
//!
//! A WebSocket broadcast hub for a multiplayer session. Clients connect, send
//! position and chat updates, and receive the updates of every other
//! connected client.
//!
//! ## Architecture Overview
//!
//! ### Core Components
//!
//! * **Transport Session** - One read loop and one write loop per WebSocket
//! * **Envelope Codec** - Two-stage decoding of inbound frames, encoding of outbound frames
//! * **Hub** - Owns the member set and applies the routing policy, one event at a time
//!
//! ### Message Flow
//!
//! 1. A session's read loop wraps each frame as `{sender, content}`
//! 2. The envelope is queued for the hub control loop
//! 3. The hub decodes the envelope, then the inner `type`-tagged payload
//! 4. The routing policy picks the frame(s) to deliver
//! 5. Frames are queued into each member's outbound queue and written by its write loop
//!
//! ## Wire Format
//!
//! Client payloads:
//!
//! ```json
//! {"type":"update","x":"10","y":"20","angle":"3.1","momentum":"0.2","name":"dizzy","sex":"1","icon":""}
//! {"type":"message","message":"hello"}
//! {"type":"login"}
//! ```
//!
//! Server frames: `welcome`, `update`, `message` and `closed`, see [`ServerFrame`].
//!
//! ## Thread Safety
//!
//! The member set is never shared. Sessions reach it only through a
//! [`HubHandle`], and each outbound queue has exactly one producer (the hub)
//! and one consumer (the session's write loop).
//!
//! ## Backpressure
//!
//! Outbound queues are bounded and filled with `try_send`. A frame for a
//! member whose queue is full is dropped for that member only; the hub never
//! waits on a slow consumer.

// Re-export core types and functions for easy access
pub use config::{ServerConfig, UpdateIdPolicy};
pub use connection::{ClientConnection, Hub, HubEvent, HubHandle, SessionId};
pub use error::{CodecError, ServerError};
pub use messaging::{Envelope, LocationInfo, Payload, ServerFrame};
pub use server::GameServer;
pub use utils::{create_server, create_server_with_config};

// Public module declarations
pub mod config;
pub mod connection;
pub mod error;
pub mod messaging;
pub mod server;
pub mod utils;
