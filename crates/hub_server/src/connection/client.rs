//! Client session representation.
//!
//! This module defines the hub's view of one connected client: its id, where
//! it connected from, and the sending half of its outbound frame queue.

use super::SessionId;
use std::net::SocketAddr;
use std::time::SystemTime;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{trace, warn};

/// Represents an individual client session registered with the hub.
///
/// The hub holds the only sender of the session's outbound queue. Dropping
/// the `ClientConnection` closes the queue, which ends the session's write loop.
///
/// # Fields
///
/// * `id` - The session id assigned at upgrade time
/// * `remote_addr` - The network address of the connected client
/// * `connected_at` - Timestamp when the connection was established
#[derive(Debug)]
pub struct ClientConnection {
    /// The session id assigned to this connection
    pub id: SessionId,

    /// The remote network address of the client
    pub remote_addr: SocketAddr,

    /// When this connection was established
    pub connected_at: SystemTime,

    outbound: mpsc::Sender<String>,
}

impl ClientConnection {
    /// Creates a new client connection around an existing outbound sender.
    pub fn new(id: SessionId, remote_addr: SocketAddr, outbound: mpsc::Sender<String>) -> Self {
        Self {
            id,
            remote_addr,
            connected_at: SystemTime::now(),
            outbound,
        }
    }

    /// Creates a connection together with the receiving end of its queue.
    ///
    /// # Arguments
    ///
    /// * `id` - The session id
    /// * `remote_addr` - The network address of the connecting client
    /// * `capacity` - Maximum number of frames waiting to be written
    pub fn with_queue(
        id: SessionId,
        remote_addr: SocketAddr,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(id, remote_addr, sender), receiver)
    }

    /// Queues a frame without waiting.
    ///
    /// A full queue drops the frame so one slow consumer never stalls the hub.
    /// A closed queue means the write loop is already gone; the frame is discarded.
    ///
    /// Returns `true` if the frame was queued.
    pub fn deliver(&self, frame: String) -> bool {
        match self.outbound.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("🐢 Outbound queue full for session {}, dropping frame", self.id);
                false
            }
            Err(TrySendError::Closed(_)) => {
                trace!("Outbound queue closed for session {}, discarding frame", self.id);
                false
            }
        }
    }
}
