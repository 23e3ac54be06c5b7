//! Data transfer objects for web requests and responses.
//!
//! Request types keep every field optional and leave validation to the
//! handlers, so a missing field produces the API's own "Required fields
//! missing" response. Malformed values (an unknown status string, a bad
//! date) fail the router's manual body parse and come back as
//! `Invalid JSON: ...`, again through the JSON error contract.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Connection, ConnectionId, ConnectionStatus, Gender, GenderPreference, Segment, Trip, TripId,
    TripStatus, User, UserId,
};
use crate::lifecycle::{AcceptedConnection, PendingRequest};
use crate::store::StoredMessage;
use crate::sweep::SweepReport;

/// Request to create or update a trip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub from: Option<String>,
    pub to: Option<String>,

    /// Travel date, ISO format (YYYY-MM-DD)
    pub date: Option<NaiveDate>,

    /// Departure time in HH:MM format
    pub time: Option<String>,

    #[serde(default)]
    pub has_connections: bool,

    /// Ordered legs; required when `has_connections` is set
    pub legs: Option<Vec<LegRequest>>,

    pub gender_preference: Option<GenderPreference>,

    /// Initial status; anything but "active" is stored as pending
    pub status: Option<TripStatus>,
}

/// One leg of a connected trip, as submitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

/// Request to open a connection between two trips.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub trip_id: Option<TripId>,
    pub matched_trip_id: Option<TripId>,
}

/// Accept or reject a pending connection.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub status: Option<ConnectionStatus>,
}

/// A user as embedded in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub declared_gender: Option<Gender>,
}

impl UserView {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            declared_gender: user.declared_gender,
        }
    }
}

/// One leg of a trip, as rendered.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegView {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub time: String,
}

impl LegView {
    fn from_segment(segment: &Segment) -> Self {
        Self {
            from: segment.origin().to_string(),
            to: segment.destination().to_string(),
            date: segment.departs().date(),
            time: segment.departs().hhmm(),
        }
    }
}

/// A trip without its owner, for embedding in connection views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: TripId,
    pub from: String,
    pub to: String,
    pub has_connections: bool,
    pub legs: Vec<LegView>,
    pub date: NaiveDate,
    pub time: String,
    pub gender_preference: GenderPreference,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

impl TripSummary {
    pub fn from_trip(trip: &Trip) -> Self {
        let headline = trip.headline();
        // Direct trips render with an empty leg list.
        let legs = if trip.is_connected() {
            trip.journey.segments().iter().map(LegView::from_segment).collect()
        } else {
            Vec::new()
        };
        Self {
            id: trip.id,
            from: headline.origin().to_string(),
            to: headline.destination().to_string(),
            has_connections: trip.is_connected(),
            legs,
            date: headline.departs().date(),
            time: headline.departs().hhmm(),
            gender_preference: trip.gender_preference,
            status: trip.status,
            created_at: trip.created_at,
        }
    }
}

/// A trip with its owner populated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripView {
    pub user: UserView,
    #[serde(flatten)]
    pub trip: TripSummary,
}

impl TripView {
    pub fn from_parts(trip: &Trip, owner: &User) -> Self {
        Self {
            user: UserView::from_user(owner),
            trip: TripSummary::from_trip(trip),
        }
    }
}

/// A connection record, ids only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    pub id: ConnectionId,
    pub trip_id: TripId,
    pub matched_trip_id: TripId,
    pub from_user: UserId,
    pub to_user: UserId,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

impl ConnectionView {
    pub fn from_connection(connection: &Connection) -> Self {
        Self {
            id: connection.id,
            trip_id: connection.trip_id,
            matched_trip_id: connection.matched_trip_id,
            from_user: connection.from_user,
            to_user: connection.to_user,
            status: connection.status,
            created_at: connection.created_at,
        }
    }
}

/// A pending request with its sender and trips populated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: ConnectionId,
    pub from_user: UserView,
    pub trip: Option<TripSummary>,
    pub matched_trip: Option<TripSummary>,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

impl NotificationView {
    pub fn from_request(request: &PendingRequest) -> Self {
        Self {
            id: request.connection.id,
            from_user: UserView::from_user(&request.from_user),
            trip: request.trip.as_ref().map(TripSummary::from_trip),
            matched_trip: request.matched_trip.as_ref().map(TripSummary::from_trip),
            status: request.connection.status,
            created_at: request.connection.created_at,
        }
    }
}

/// An accepted connection, fully populated for the companions view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedView {
    pub id: ConnectionId,
    pub trip: TripSummary,
    pub matched_trip: TripSummary,
    pub from_user: UserView,
    pub to_user: UserView,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

impl AcceptedView {
    pub fn from_accepted(accepted: &AcceptedConnection) -> Self {
        Self {
            id: accepted.connection.id,
            trip: TripSummary::from_trip(&accepted.trip),
            matched_trip: TripSummary::from_trip(&accepted.matched_trip),
            from_user: UserView::from_user(&accepted.from_user),
            to_user: UserView::from_user(&accepted.to_user),
            status: accepted.connection.status,
            created_at: accepted.connection.created_at,
        }
    }
}

/// A chat message in connection history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: uuid::Uuid,
    pub connection_id: ConnectionId,
    pub sender: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl MessageView {
    pub fn from_stored(message: &StoredMessage) -> Self {
        Self {
            id: message.id,
            connection_id: message.connection_id,
            sender: message.sender,
            text: message.text.clone(),
            sent_at: message.sent_at,
        }
    }
}

/// Result of a sweep run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReportView {
    pub trips_completed: usize,
    pub connections_completed: usize,
    pub trips_activated: usize,
    pub failures: usize,
}

impl SweepReportView {
    pub fn from_report(report: &SweepReport) -> Self {
        Self {
            trips_completed: report.trips_completed,
            connections_completed: report.connections_completed,
            trips_activated: report.trips_activated,
            failures: report.failures,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
