//! Connection entity: a proposed or approved pairing of two trips.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TripId, UserId};

/// Opaque connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        ConnectionId(Uuid::new_v4())
    }

    /// Parse an id from its string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(ConnectionId)
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Approval state of a connection.
///
/// `Rejected` and `Completed` are terminal: a rejected pair may never be
/// re-requested, and a completed connection is never revived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl ConnectionStatus {
    /// Returns true for states that admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionStatus::Rejected | ConnectionStatus::Completed)
    }
}

/// A pairing between an initiating trip and a matched trip.
///
/// `from_user` owns `trip_id`; `to_user` owns `matched_trip_id` and is
/// the only party who may accept or reject. Connections are never
/// deleted; terminal records remain as history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub trip_id: TripId,
    pub matched_trip_id: TripId,
    pub from_user: UserId,
    pub to_user: UserId,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// Create a pending connection request with a fresh id.
    pub fn pending(
        trip_id: TripId,
        matched_trip_id: TripId,
        from_user: UserId,
        to_user: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            trip_id,
            matched_trip_id,
            from_user,
            to_user,
            status: ConnectionStatus::Pending,
            created_at,
        }
    }

    /// Returns true if the given user is either party.
    pub fn involves(&self, user: UserId) -> bool {
        self.from_user == user || self.to_user == user
    }
}
