//! Connection handling logic for WebSocket clients.
//!
//! This module contains the lifecycle of an individual client session: the
//! upgrade handshake, registration with the hub, and the paired read and
//! write loops that run until the transport is unusable.

use crate::{
    connection::{ClientConnection, HubHandle, SessionId},
    error::ServerError,
    messaging::{encode_envelope, Envelope},
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{ErrorResponse, Request, Response},
        http::StatusCode,
        Message,
    },
    WebSocketStream,
};
use tracing::{debug, error, trace, warn};

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsSource = SplitStream<WebSocketStream<TcpStream>>;

/// Handles a single client connection from upgrade to cleanup.
///
/// # Connection Flow
///
/// 1. Perform the WebSocket handshake, rejecting any path but `ws_path` with 404
/// 2. Assign a fresh [`SessionId`] and an outbound queue
/// 3. Register the session with the hub
/// 4. Run the read and write loops until both have finished
///
/// # Arguments
///
/// * `stream` - The TCP stream for the client connection
/// * `addr` - The remote address of the client
/// * `hub` - Handle to the hub control loop
/// * `ws_path` - The only path on which upgrades are accepted
/// * `outbound_capacity` - Size of the session's outbound queue
///
/// # Returns
///
/// `Ok(())` once the session has ended, or a `ServerError` if the handshake
/// failed or the hub was unavailable.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    hub: HubHandle,
    ws_path: &str,
    outbound_capacity: usize,
) -> Result<(), ServerError> {
    let check_path = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        if request.uri().path() == ws_path {
            Ok(response)
        } else {
            let mut not_found = ErrorResponse::new(Some("Not Found".to_string()));
            *not_found.status_mut() = StatusCode::NOT_FOUND;
            Err(not_found)
        }
    };

    let ws_stream = accept_hdr_async(stream, check_path)
        .await
        .map_err(|e| ServerError::Network(format!("WebSocket handshake failed: {e}")))?;

    let id = SessionId::new();
    let (connection, outbound) = ClientConnection::with_queue(id.clone(), addr, outbound_capacity);
    hub.register(connection).await?;

    let (ws_sender, ws_receiver) = ws_stream.split();

    tokio::join!(
        read_loop(id.clone(), ws_receiver, hub.clone()),
        write_loop(id.clone(), ws_sender, outbound, hub),
    );

    debug!("🔌 Session {} finished", id);
    Ok(())
}

/// Forwards every inbound frame to the hub, then unregisters exactly once.
async fn read_loop(id: SessionId, source: WsSource, hub: HubHandle) {
    if let Err(e) = forward_inbound(&id, source, &hub).await {
        error!("Read failed for session {}: {}", id, e);
    }
    if let Err(e) = hub.unregister(id.clone()).await {
        debug!("Could not unregister session {}: {}", id, e);
    }
}

async fn forward_inbound(
    id: &SessionId,
    mut source: WsSource,
    hub: &HubHandle,
) -> Result<(), ServerError> {
    while let Some(message) = source.next().await {
        let content = match message? {
            Message::Text(text) => text.as_str().to_owned(),
            Message::Binary(data) => match String::from_utf8(data.to_vec()) {
                Ok(text) => text,
                Err(_) => {
                    warn!("Session {} sent a non UTF-8 binary frame, skipping", id);
                    continue;
                }
            },
            Message::Close(_) => {
                debug!("🔌 Session {} requested close", id);
                return Ok(());
            }
            _ => continue,
        };

        let envelope = Envelope {
            sender: id.to_string(),
            content,
        };
        match encode_envelope(&envelope) {
            Ok(raw) => hub.broadcast(raw).await?,
            Err(e) => warn!("Failed to wrap frame from session {}: {}", id, e),
        }
    }
    Ok(())
}

/// Drains the outbound queue into the socket.
///
/// When the hub closes the queue a close frame is sent. A write failure
/// ends the loop and asks the hub to drop the session.
async fn write_loop(
    id: SessionId,
    mut sink: WsSink,
    mut outbound: mpsc::Receiver<String>,
    hub: HubHandle,
) {
    match drain_outbound(&mut sink, &mut outbound).await {
        Ok(()) => {
            if let Err(e) = sink.send(Message::Close(None)).await {
                trace!("Close frame for session {} not sent: {}", id, e);
            }
        }
        Err(e) => {
            error!("Failed to send message to session {}: {}", id, e);
            if let Err(e) = hub.unregister(id.clone()).await {
                debug!("Could not unregister session {}: {}", id, e);
            }
        }
    }
}

async fn drain_outbound(
    sink: &mut WsSink,
    outbound: &mut mpsc::Receiver<String>,
) -> Result<(), ServerError> {
    while let Some(frame) = outbound.recv().await {
        sink.send(Message::Text(frame.into())).await?;
    }
    Ok(())
}
