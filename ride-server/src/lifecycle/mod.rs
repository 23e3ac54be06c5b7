//! Connection lifecycle manager.
//!
//! Owns the connection state machine:
//!
//! ```text
//!  (none) --request--> pending --accept--> accepted --(sweep)--> completed
//!                          |
//!                        reject
//!                          v
//!                      rejected [terminal]
//! ```
//!
//! Every domain check runs before any mutation; the first failing check
//! short-circuits, so a failed request leaves the stores untouched.

use chrono::{DateTime, Utc};

use crate::domain::{
    Connection, ConnectionId, ConnectionStatus, Trip, TripId, TripStatus, User, UserId,
};
use crate::store::{ConnectionStore, TripStore, UserStore};

/// Errors from lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// A referenced trip id is unknown.
    #[error("trip not found")]
    TripNotFound,

    /// The connection id is unknown.
    #[error("connection not found")]
    ConnectionNotFound,

    /// The requester does not own the source trip.
    #[error("not the owner of this trip")]
    NotTripOwner,

    /// Both trips belong to the requester.
    #[error("cannot connect to your own trip")]
    SelfConnection,

    /// This pair was rejected before; no re-request is permitted.
    #[error("this request was previously rejected")]
    PreviouslyRejected,

    /// A request for this pair already exists.
    #[error("connection request already exists")]
    DuplicateRequest,

    /// The responder is not the recipient of the request.
    #[error("not authorized to act on this request")]
    NotRecipient,

    /// Respond was called with something other than accept or reject.
    #[error("invalid status")]
    InvalidTargetStatus,

    /// The connection is already rejected or completed.
    #[error("connection already settled")]
    AlreadySettled,

    /// An accepted connection cannot be rejected afterwards.
    #[error("connection already accepted")]
    AlreadyAccepted,
}

/// A fully populated accepted connection, for the companions view.
#[derive(Debug, Clone)]
pub struct AcceptedConnection {
    pub connection: Connection,
    pub trip: Trip,
    pub matched_trip: Trip,
    pub from_user: User,
    pub to_user: User,
}

/// A pending request with its sender and both trips, for notifications.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub connection: Connection,
    pub from_user: User,
    pub trip: Option<Trip>,
    pub matched_trip: Option<Trip>,
}

/// Creates and transitions connections between trips.
#[derive(Clone)]
pub struct LifecycleManager {
    trips: TripStore,
    connections: ConnectionStore,
    users: UserStore,
}

impl LifecycleManager {
    /// Create a manager over the shared stores.
    pub fn new(trips: TripStore, connections: ConnectionStore, users: UserStore) -> Self {
        Self {
            trips,
            connections,
            users,
        }
    }

    /// Send a connection request from the requester's trip to a matched
    /// trip.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::TripNotFound`] if either trip is unknown
    /// - [`LifecycleError::NotTripOwner`] if the requester does not own
    ///   the source trip
    /// - [`LifecycleError::SelfConnection`] if the requester also owns
    ///   the matched trip
    /// - [`LifecycleError::PreviouslyRejected`] if this exact pair was
    ///   rejected before (terminal, no retry)
    /// - [`LifecycleError::DuplicateRequest`] if a record for this exact
    ///   pair already exists in any other state
    pub async fn request(
        &self,
        requester: UserId,
        trip_id: TripId,
        matched_trip_id: TripId,
        now: DateTime<Utc>,
    ) -> Result<Connection, LifecycleError> {
        let trip = self
            .trips
            .get(trip_id)
            .await
            .ok_or(LifecycleError::TripNotFound)?;
        let matched_trip = self
            .trips
            .get(matched_trip_id)
            .await
            .ok_or(LifecycleError::TripNotFound)?;

        if trip.owner != requester {
            return Err(LifecycleError::NotTripOwner);
        }

        let to_user = matched_trip.owner;
        if requester == to_user {
            return Err(LifecycleError::SelfConnection);
        }

        if let Some(existing) = self.connections.find_pair(trip_id, matched_trip_id).await {
            return Err(match existing.status {
                ConnectionStatus::Rejected => LifecycleError::PreviouslyRejected,
                _ => LifecycleError::DuplicateRequest,
            });
        }

        let connection = Connection::pending(trip_id, matched_trip_id, requester, to_user, now);
        self.connections.insert(connection.clone()).await;
        Ok(connection)
    }

    /// Accept or reject a pending request.
    ///
    /// Only the recipient (`to_user`) may respond, and only `Accepted` or
    /// `Rejected` are valid targets. Accepting activates both trips as a
    /// side effect; repeating an accept is idempotent.
    pub async fn respond(
        &self,
        responder: UserId,
        connection_id: ConnectionId,
        target: ConnectionStatus,
    ) -> Result<Connection, LifecycleError> {
        let connection = self
            .connections
            .get(connection_id)
            .await
            .ok_or(LifecycleError::ConnectionNotFound)?;

        if connection.to_user != responder {
            return Err(LifecycleError::NotRecipient);
        }

        // Rejected and completed records admit no further transitions;
        // re-accepting an accepted request stays allowed (idempotent).
        if connection.status.is_terminal() {
            return Err(LifecycleError::AlreadySettled);
        }

        if !matches!(
            target,
            ConnectionStatus::Accepted | ConnectionStatus::Rejected
        ) {
            return Err(LifecycleError::InvalidTargetStatus);
        }

        // Once accepted, only the sweep may move the record on; flipping
        // to rejected would strand two active trips.
        if connection.status == ConnectionStatus::Accepted && target == ConnectionStatus::Rejected {
            return Err(LifecycleError::AlreadyAccepted);
        }

        self.connections.set_status(connection_id, target).await;

        if target == ConnectionStatus::Accepted {
            self.trips
                .set_status(connection.trip_id, TripStatus::Active)
                .await;
            self.trips
                .set_status(connection.matched_trip_id, TripStatus::Active)
                .await;
        }

        // Re-read so the caller sees the stored state.
        self.connections
            .get(connection_id)
            .await
            .ok_or(LifecycleError::ConnectionNotFound)
    }

    /// All connections where the caller is either party.
    pub async fn mine(&self, caller: UserId) -> Vec<Connection> {
        self.connections.involving(caller).await
    }

    /// Pending requests addressed to the caller, populated with the
    /// sender and both trips.
    pub async fn notifications(&self, caller: UserId) -> Vec<PendingRequest> {
        let mut requests = Vec::new();
        for connection in self.connections.pending_for(caller).await {
            let Some(from_user) = self.users.get(connection.from_user).await else {
                // Sender account is gone; nothing useful to show.
                continue;
            };
            let trip = self.trips.get(connection.trip_id).await;
            let matched_trip = self.trips.get(connection.matched_trip_id).await;
            requests.push(PendingRequest {
                connection,
                from_user,
                trip,
                matched_trip,
            });
        }
        requests
    }

    /// Accepted connections involving the caller, fully populated.
    ///
    /// Records whose user references no longer resolve are filtered out.
    pub async fn accepted(&self, caller: UserId) -> Vec<AcceptedConnection> {
        let mut accepted = Vec::new();
        for connection in self.connections.involving(caller).await {
            if connection.status != ConnectionStatus::Accepted {
                continue;
            }
            let (Some(from_user), Some(to_user)) = (
                self.users.get(connection.from_user).await,
                self.users.get(connection.to_user).await,
            ) else {
                continue;
            };
            let (Some(trip), Some(matched_trip)) = (
                self.trips.get(connection.trip_id).await,
                self.trips.get(connection.matched_trip_id).await,
            ) else {
                continue;
            };
            accepted.push(AcceptedConnection {
                connection,
                trip,
                matched_trip,
                from_user,
                to_user,
            });
        }
        accepted
    }
}
