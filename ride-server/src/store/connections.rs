//! Connection store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Connection, ConnectionId, ConnectionStatus, TripId, UserId};

/// Thread-safe connection store.
///
/// Holds at most one record per ordered (trip, matched trip) pair; the
/// lifecycle manager checks [`find_pair`] before inserting. Records are
/// never deleted.
///
/// [`find_pair`]: ConnectionStore::find_pair
#[derive(Clone, Default)]
pub struct ConnectionStore {
    inner: Arc<RwLock<HashMap<ConnectionId, Connection>>>,
}

impl ConnectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a connection record.
    pub async fn insert(&self, connection: Connection) {
        let mut guard = self.inner.write().await;
        guard.insert(connection.id, connection);
    }

    /// Look up a connection by id.
    pub async fn get(&self, id: ConnectionId) -> Option<Connection> {
        let guard = self.inner.read().await;
        guard.get(&id).cloned()
    }

    /// Find the record for an exact ordered (trip, matched trip) pair.
    pub async fn find_pair(&self, trip_id: TripId, matched_trip_id: TripId) -> Option<Connection> {
        let guard = self.inner.read().await;
        guard
            .values()
            .find(|c| c.trip_id == trip_id && c.matched_trip_id == matched_trip_id)
            .cloned()
    }

    /// Snapshot of every connection with the given status, ordered by
    /// creation time.
    pub async fn by_status(&self, status: ConnectionStatus) -> Vec<Connection> {
        let guard = self.inner.read().await;
        let mut found: Vec<Connection> =
            guard.values().filter(|c| c.status == status).cloned().collect();
        found.sort_by_key(|c| (c.created_at, c.id.to_string()));
        found
    }

    /// Snapshot of every connection where the user is either party,
    /// ordered by creation time.
    pub async fn involving(&self, user: UserId) -> Vec<Connection> {
        let guard = self.inner.read().await;
        let mut found: Vec<Connection> =
            guard.values().filter(|c| c.involves(user)).cloned().collect();
        found.sort_by_key(|c| (c.created_at, c.id.to_string()));
        found
    }

    /// Pending connections addressed to the given user, ordered by
    /// creation time.
    pub async fn pending_for(&self, user: UserId) -> Vec<Connection> {
        let guard = self.inner.read().await;
        let mut found: Vec<Connection> = guard
            .values()
            .filter(|c| c.to_user == user && c.status == ConnectionStatus::Pending)
            .cloned()
            .collect();
        found.sort_by_key(|c| (c.created_at, c.id.to_string()));
        found
    }

    /// Set a connection's status. Returns false if the id is unknown.
    pub async fn set_status(&self, id: ConnectionId, status: ConnectionStatus) -> bool {
        let mut guard = self.inner.write().await;
        match guard.get_mut(&id) {
            Some(connection) => {
                connection.status = status;
                true
            }
            None => false,
        }
    }

    /// Number of stored connections.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// True if no connections are stored.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }
}
