//! Discovery engine.
//!
//! Expands the base trip into its comparable segments, snapshots the
//! candidate pool in one bulk read, then matches entirely in memory.

use crate::config::CoreConfig;
use crate::domain::{Trip, TripId, User, UserId};
use crate::store::{TripStore, UserStore};

use super::compat::{mutual_gender, segments_match};

/// Errors from a discovery run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    /// The base trip id is unknown.
    #[error("trip not found")]
    TripNotFound,
}

/// A candidate trip together with its owner, for display.
#[derive(Debug, Clone)]
pub struct MatchedTrip {
    pub trip: Trip,
    pub owner: User,
}

/// Matches for one leg of the base trip, keyed by the human-readable
/// `"origin → destination"` label.
#[derive(Debug, Clone)]
pub struct LegMatches {
    pub label: String,
    pub trips: Vec<MatchedTrip>,
}

/// Finds trips compatible with a base trip's legs.
#[derive(Clone)]
pub struct DiscoveryEngine {
    trips: TripStore,
    users: UserStore,
    tolerance_mins: i64,
}

impl DiscoveryEngine {
    /// Create an engine over the shared stores.
    pub fn new(trips: TripStore, users: UserStore, config: &CoreConfig) -> Self {
        Self {
            trips,
            users,
            tolerance_mins: config.time_tolerance_mins,
        }
    }

    /// Run discovery for `base_trip_id` on behalf of `requester`.
    ///
    /// Candidates are drawn from all stored trips excluding the base trip
    /// and any trip the requester owns. For each leg of the base trip a
    /// candidate qualifies when any of three cases holds:
    ///
    /// - the leg matches one of the candidate's own legs;
    /// - the leg matches the candidate's trip-level segment (candidates
    ///   who never modeled their trip as legs);
    /// - for a direct base trip only, one of the candidate's legs matches
    ///   the base trip's trip-level segment.
    ///
    /// Gender compatibility is evaluated once per candidate at trip level
    /// and gates all three cases. Candidates whose owner record is
    /// missing are skipped: their gender is unknown, so the pair fails
    /// closed and there is nothing to display.
    ///
    /// Buckets appear in base-leg order; two legs with the same label
    /// share a bucket. Within a bucket, trips follow candidate scan
    /// order. A candidate can appear under several legs.
    pub async fn discover(
        &self,
        requester: UserId,
        base_trip_id: TripId,
    ) -> Result<Vec<LegMatches>, DiscoveryError> {
        let base = self
            .trips
            .get(base_trip_id)
            .await
            .ok_or(DiscoveryError::TripNotFound)?;
        let base_gender = match self.users.get(base.owner).await {
            Some(owner) => owner.declared_gender,
            None => None,
        };

        // Snapshot the candidate pool and populate owners up front;
        // all matching below is synchronous in-memory work.
        let candidates: Vec<(Trip, Option<User>)> = {
            let mut pool = Vec::new();
            for trip in self.trips.all().await {
                if trip.id == base.id || trip.owner == requester {
                    continue;
                }
                let owner = self.users.get(trip.owner).await;
                pool.push((trip, owner));
            }
            pool
        };

        let mut results: Vec<LegMatches> = Vec::new();
        for base_leg in base.journey.segments() {
            let label = base_leg.label();
            let mut matches: Vec<MatchedTrip> = Vec::new();

            for (candidate, owner) in &candidates {
                let Some(owner) = owner else {
                    continue;
                };

                if !mutual_gender(
                    Some(base.gender_preference),
                    base_gender,
                    Some(candidate.gender_preference),
                    owner.declared_gender,
                ) {
                    continue;
                }

                let candidate_legs = candidate.journey.segments();

                let direct_leg_match = candidate_legs
                    .iter()
                    .any(|leg| segments_match(base_leg, leg, self.tolerance_mins));

                let whole_trip_match =
                    segments_match(base_leg, candidate.headline(), self.tolerance_mins);

                let reverse_leg_match = !base.is_connected()
                    && candidate_legs
                        .iter()
                        .any(|leg| segments_match(leg, base.headline(), self.tolerance_mins));

                if direct_leg_match || whole_trip_match || reverse_leg_match {
                    matches.push(MatchedTrip {
                        trip: candidate.clone(),
                        owner: owner.clone(),
                    });
                }
            }

            // Two legs on the same route share one bucket in the output.
            match results.iter_mut().find(|bucket| bucket.label == label) {
                Some(bucket) => bucket.trips.extend(matches),
                None => results.push(LegMatches {
                    label,
                    trips: matches,
                }),
            }
        }

        Ok(results)
    }
}
