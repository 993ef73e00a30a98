//! The hub: connection registry and broadcast control loop.
//!
//! All membership changes and all fan-out decisions happen inside
//! [`Hub::run`], one event at a time. Sessions talk to the hub only through a
//! cloneable [`HubHandle`], so the member set has a single writer and needs
//! no lock.

use super::{client::ClientConnection, SessionId};
use crate::{
    config::UpdateIdPolicy,
    error::ServerError,
    messaging::{encode_frame, plan_route, LocationInfo, Route, ServerFrame},
};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// An input to the hub control loop.
///
/// The three event classes share one queue, so everything a single session
/// sends is processed in the order it was sent: its register always comes
/// before its broadcasts and its unregister.
#[derive(Debug)]
pub enum HubEvent {
    /// Add a session to the member set and greet it
    Register(ClientConnection),
    /// Remove a session if it is still a member
    Unregister(SessionId),
    /// A serialized envelope read from some session
    Broadcast(Vec<u8>),
}

/// Cloneable entry point into a running [`Hub`].
#[derive(Debug, Clone)]
pub struct HubHandle {
    events: mpsc::Sender<HubEvent>,
}

impl HubHandle {
    /// Submits a freshly upgraded session for registration.
    pub async fn register(&self, connection: ClientConnection) -> Result<(), ServerError> {
        self.send(HubEvent::Register(connection)).await
    }

    /// Asks the hub to drop a session. Safe to call more than once.
    pub async fn unregister(&self, id: SessionId) -> Result<(), ServerError> {
        self.send(HubEvent::Unregister(id)).await
    }

    /// Hands a serialized envelope to the hub for routing.
    pub async fn broadcast(&self, envelope: Vec<u8>) -> Result<(), ServerError> {
        self.send(HubEvent::Broadcast(envelope)).await
    }

    async fn send(&self, event: HubEvent) -> Result<(), ServerError> {
        self.events
            .send(event)
            .await
            .map_err(|_| ServerError::Internal("Hub control loop has stopped".to_string()))
    }
}

/// Owner of the member set.
///
/// # Architecture
///
/// * One bounded inbound queue of [`HubEvent`]s, fed by every session
/// * A `HashMap` of current members, touched only by the control loop
/// * Non-blocking delivery into each member's outbound queue
#[derive(Debug)]
pub struct Hub {
    members: HashMap<SessionId, ClientConnection>,
    events: mpsc::Receiver<HubEvent>,
    update_id_policy: UpdateIdPolicy,
}

impl Hub {
    /// Creates a hub and the handle used to feed it.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Size of the inbound event queue
    /// * `update_id_policy` - Id labelling for position broadcasts
    pub fn new(capacity: usize, update_id_policy: UpdateIdPolicy) -> (Self, HubHandle) {
        let (sender, receiver) = mpsc::channel(capacity);
        let hub = Self {
            members: HashMap::new(),
            events: receiver,
            update_id_policy,
        };
        (hub, HubHandle { events: sender })
    }

    /// Runs the control loop until every [`HubHandle`] has been dropped.
    ///
    /// No single event can end the loop: bad messages and failed sessions are
    /// logged and skipped.
    pub async fn run(mut self) {
        info!("🛰️ Hub control loop started");
        while let Some(event) = self.events.recv().await {
            self.handle_event(event);
        }
        info!("🛰️ Hub control loop stopped with {} member(s)", self.members.len());
    }

    /// Number of currently registered sessions.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn handle_event(&mut self, event: HubEvent) {
        match event {
            HubEvent::Register(connection) => self.register(connection),
            HubEvent::Unregister(id) => self.unregister(&id),
            HubEvent::Broadcast(envelope) => self.broadcast(&envelope),
        }
    }

    fn register(&mut self, connection: ClientConnection) {
        let id = connection.id.clone();
        info!("🔗 Session {} joined from {}", id, connection.remote_addr);

        let welcome = encode_or_log(&ServerFrame::Welcome { id: id.to_string() });
        let initial = encode_or_log(&ServerFrame::Update(LocationInfo::initial(id.as_str())));
        for frame in [welcome, initial].into_iter().flatten() {
            connection.deliver(frame);
        }

        self.members.insert(id, connection);
    }

    fn unregister(&mut self, id: &SessionId) {
        // Dropping the connection closes its outbound queue.
        let Some(connection) = self.members.remove(id) else {
            return;
        };
        drop(connection);
        info!("❌ Session {} disconnected", id);

        if let Some(frame) = encode_or_log(&ServerFrame::Closed { id: id.to_string() }) {
            for member in self.members.values() {
                member.deliver(frame.clone());
            }
        }
    }

    fn broadcast(&mut self, envelope: &[u8]) {
        let route = match plan_route(envelope, self.update_id_policy) {
            Ok(route) => route,
            Err(e) => {
                warn!("📭 Discarding message: {}", e);
                return;
            }
        };

        match route {
            Route::Ignore => {}
            Route::Everyone(frame) => {
                debug!("📡 Broadcasting to {} member(s): {}", self.members.len(), frame);
                for member in self.members.values() {
                    member.deliver(frame.clone());
                }
            }
            Route::PerRecipient(location) => {
                debug!("📡 Broadcasting position to {} member(s)", self.members.len());
                for member in self.members.values() {
                    let copy = location.with_id(member.id.as_str());
                    if let Some(frame) = encode_or_log(&ServerFrame::Update(copy)) {
                        member.deliver(frame);
                    }
                }
            }
        }
    }
}

fn encode_or_log(frame: &ServerFrame) -> Option<String> {
    match encode_frame(frame) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to encode outbound frame: {}", e);
            None
        }
    }
}
