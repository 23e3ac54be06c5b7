//! Trip entity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GenderPreference, Journey, Segment, UserId};

/// Opaque trip identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(Uuid);

impl TripId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        TripId(Uuid::new_v4())
    }

    /// Parse an id from its string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(TripId)
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a trip.
///
/// Created as `Pending` (or `Active` per caller), `Active` once an
/// associated connection is accepted, `Completed` once its travel window
/// has passed. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Pending,
    Active,
    Completed,
}

/// A user's declared travel intent.
///
/// Exclusively owned by its creating user: field updates and deletion are
/// owner-only, while the lifecycle manager and the auto-completion sweep
/// mutate `status` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: TripId,
    pub owner: UserId,
    pub journey: Journey,
    pub gender_preference: GenderPreference,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Create a trip with a fresh id.
    pub fn new(
        owner: UserId,
        journey: Journey,
        gender_preference: GenderPreference,
        status: TripStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TripId::new(),
            owner,
            journey,
            gender_preference,
            status,
            created_at,
        }
    }

    /// The trip-level segment (declared origin, destination, departure).
    pub fn headline(&self) -> &Segment {
        self.journey.headline()
    }

    /// True for multi-leg trips.
    pub fn is_connected(&self) -> bool {
        self.journey.is_connected()
    }
}
