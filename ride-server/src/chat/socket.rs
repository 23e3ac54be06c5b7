//! WebSocket chat transport.
//!
//! Each accepted connection has a room. A client joins the room for its
//! connection id and then exchanges `sendMessage` / `receiveMessage`
//! events; refusals come back as `errorMessage` to the offending socket
//! only, while admitted messages are broadcast to every room member,
//! sender included.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use chrono::{DateTime, Utc};
use futures::{Sink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};

use crate::domain::{ConnectionId, UserId};
use crate::store::StoredMessage;

use super::gate::ChatGate;

/// Capacity of each room's broadcast channel. A lagging reader loses the
/// oldest events rather than blocking the room.
const ROOM_CAPACITY: usize = 64;

/// An admitted message, as broadcast to a room.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomEvent {
    pub connection_id: ConnectionId,
    pub sender: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl From<StoredMessage> for RoomEvent {
    fn from(m: StoredMessage) -> Self {
        Self {
            connection_id: m.connection_id,
            sender: m.sender,
            text: m.text,
            sent_at: m.sent_at,
        }
    }
}

/// Events a client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinRoom { connection_id: ConnectionId },
    #[serde(rename_all = "camelCase")]
    SendMessage {
        connection_id: ConnectionId,
        text: String,
    },
}

/// Events the server sends.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    ReceiveMessage(RoomEvent),
    #[serde(rename_all = "camelCase")]
    ErrorMessage { message: String },
}

/// Registry of live chat rooms, one broadcast channel per connection.
///
/// Rooms are created on first join and live for the life of the process;
/// the channel itself holds no history.
#[derive(Clone, Default)]
pub struct ChatRooms {
    inner: Arc<RwLock<HashMap<ConnectionId, broadcast::Sender<RoomEvent>>>>,
}

impl ChatRooms {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a connection's room, creating it if needed.
    pub async fn join(&self, connection_id: ConnectionId) -> broadcast::Receiver<RoomEvent> {
        let mut guard = self.inner.write().await;
        guard
            .entry(connection_id)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Broadcast an event to a room. A room nobody has joined drops the
    /// event silently.
    pub async fn publish(&self, event: RoomEvent) {
        let guard = self.inner.read().await;
        if let Some(sender) = guard.get(&event.connection_id) {
            // Err here only means no live subscribers.
            let _ = sender.send(event);
        }
    }
}

/// Upgrade an authenticated request to a chat socket.
pub fn ws_handler(ws: WebSocketUpgrade, gate: ChatGate, rooms: ChatRooms, user: UserId) -> Response {
    ws.on_upgrade(move |socket| drive(socket, gate, rooms, user))
}

/// Per-socket event loop: interleaves client events with room broadcasts
/// until the client disconnects.
async fn drive(socket: WebSocket, gate: ChatGate, rooms: ChatRooms, user: UserId) {
    let (mut tx, mut rx) = socket.split();
    let mut room: Option<broadcast::Receiver<RoomEvent>> = None;

    debug!(user = %user, "chat socket opened");
    loop {
        tokio::select! {
            incoming = rx.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        warn!(user = %user, error = %err, "chat socket error");
                        break;
                    }
                };
                let reply = match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(ClientEvent::JoinRoom { connection_id }) => {
                        room = Some(rooms.join(connection_id).await);
                        debug!(user = %user, connection = %connection_id, "joined chat room");
                        None
                    }
                    Ok(ClientEvent::SendMessage { connection_id, text }) => {
                        match gate.send(connection_id, user, text, Utc::now()).await {
                            Ok(stored) => {
                                rooms.publish(stored.into()).await;
                                None
                            }
                            Err(err) => Some(ServerEvent::ErrorMessage {
                                message: err.to_string(),
                            }),
                        }
                    }
                    Err(_) => Some(ServerEvent::ErrorMessage {
                        message: "unrecognized event".to_owned(),
                    }),
                };
                if let Some(event) = reply {
                    if send_event(&mut tx, &event).await.is_err() {
                        break;
                    }
                }
            }
            broadcast = recv_room(&mut room) => {
                match broadcast {
                    Ok(event) => {
                        let out = ServerEvent::ReceiveMessage(event);
                        if send_event(&mut tx, &out).await.is_err() {
                            break;
                        }
                    }
                    // Lagged: skip what was lost and keep listening.
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => {
                        room = None;
                    }
                }
            }
        }
    }
    debug!(user = %user, "chat socket closed");
}

/// Receive from the joined room, or park forever if no room is joined.
async fn recv_room(
    room: &mut Option<broadcast::Receiver<RoomEvent>>,
) -> Result<RoomEvent, broadcast::error::RecvError> {
    match room {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

async fn send_event(
    tx: &mut (impl Sink<Message> + Unpin),
    event: &ServerEvent,
) -> Result<(), ()> {
    let json = serde_json::to_string(event).map_err(|_| ())?;
    tx.send(Message::Text(json)).await.map_err(|_| ())
}
