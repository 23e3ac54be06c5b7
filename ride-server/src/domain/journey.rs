//! Journey type: a trip's route as one segment or an ordered chain of legs.

use std::slice;

use super::{DomainError, Segment};

/// A traveler's declared route.
///
/// Every trip has a headline segment (its top-level origin, destination
/// and departure). A `Connected` journey additionally carries the ordered
/// legs of a multi-hop route; a `Direct` journey is just its headline.
///
/// # Invariants
///
/// For `Connected` journeys, validated at construction:
/// - the leg list is non-empty
/// - the first leg's origin equals the headline origin (case-insensitive)
/// - the last leg's destination equals the headline destination
///   (case-insensitive)
///
/// # Examples
///
/// ```
/// use ride_server::domain::{Journey, Segment, Stop, WallClock};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let seg = |from: &str, to: &str, hhmm: &str| {
///     Segment::new(
///         Stop::parse(from).unwrap(),
///         Stop::parse(to).unwrap(),
///         WallClock::parse_hhmm(hhmm, date).unwrap(),
///     )
/// };
///
/// let direct = Journey::direct(seg("Delhi", "Jaipur", "09:00"));
/// assert_eq!(direct.segments().len(), 1);
///
/// let connected = Journey::connected(
///     seg("Delhi", "Agra", "08:00"),
///     vec![seg("delhi", "Mathura", "08:00"), seg("Mathura", "AGRA", "10:30")],
/// )
/// .unwrap();
/// assert_eq!(connected.segments().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Journey {
    /// A single point-to-point trip.
    Direct(Segment),
    /// A multi-hop trip: the headline segment plus its ordered legs.
    Connected {
        headline: Segment,
        legs: Vec<Segment>,
    },
}

impl Journey {
    /// Create a direct journey from a single segment.
    pub fn direct(segment: Segment) -> Self {
        Journey::Direct(segment)
    }

    /// Create a connected journey, validating the leg boundary invariant.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `legs` is empty, or if the first leg's origin or
    /// last leg's destination does not match the headline.
    pub fn connected(headline: Segment, legs: Vec<Segment>) -> Result<Self, DomainError> {
        let first = legs.first().ok_or(DomainError::EmptyConnectedJourney)?;
        if first.origin() != headline.origin() {
            return Err(DomainError::FirstLegOriginMismatch);
        }
        // Non-empty, so last() is present.
        let last = legs.last().ok_or(DomainError::EmptyConnectedJourney)?;
        if last.destination() != headline.destination() {
            return Err(DomainError::LastLegDestinationMismatch);
        }
        Ok(Journey::Connected { headline, legs })
    }

    /// Returns the trip-level segment: the declared origin, destination
    /// and primary departure.
    pub fn headline(&self) -> &Segment {
        match self {
            Journey::Direct(segment) => segment,
            Journey::Connected { headline, .. } => headline,
        }
    }

    /// Projects the journey to the ordered segments discovery compares:
    /// the legs for a connected journey, the headline for a direct one.
    pub fn segments(&self) -> &[Segment] {
        match self {
            Journey::Direct(segment) => slice::from_ref(segment),
            Journey::Connected { legs, .. } => legs,
        }
    }

    /// Returns true for multi-leg journeys.
    pub fn is_connected(&self) -> bool {
        matches!(self, Journey::Connected { .. })
    }
}
