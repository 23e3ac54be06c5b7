//! Chat message store.
//!
//! Messages are persisted so the daily cap can be enforced by counting
//! stored records rather than keeping a separate in-memory counter; the
//! count survives reconnects and is shared by every socket.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ConnectionId, UserId};

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: Uuid,
    pub connection_id: ConnectionId,
    pub sender: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Thread-safe append-only message store.
#[derive(Clone, Default)]
pub struct MessageStore {
    inner: Arc<RwLock<Vec<StoredMessage>>>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, returning the stored record.
    pub async fn append(
        &self,
        connection_id: ConnectionId,
        sender: UserId,
        text: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> StoredMessage {
        let message = StoredMessage {
            id: Uuid::new_v4(),
            connection_id,
            sender,
            text: text.into(),
            sent_at,
        };
        let mut guard = self.inner.write().await;
        guard.push(message.clone());
        message
    }

    /// Count messages from one sender on one connection at or after the
    /// given instant.
    pub async fn count_since(
        &self,
        connection_id: ConnectionId,
        sender: UserId,
        since: DateTime<Utc>,
    ) -> usize {
        let guard = self.inner.read().await;
        guard
            .iter()
            .filter(|m| m.connection_id == connection_id && m.sender == sender && m.sent_at >= since)
            .count()
    }

    /// Snapshot of a connection's messages in send order.
    pub async fn for_connection(&self, connection_id: ConnectionId) -> Vec<StoredMessage> {
        let guard = self.inner.read().await;
        guard
            .iter()
            .filter(|m| m.connection_id == connection_id)
            .cloned()
            .collect()
    }
}
