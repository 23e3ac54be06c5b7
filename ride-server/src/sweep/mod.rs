//! Time-driven auto-completion sweep.
//!
//! Periodically retires trips whose travel window has passed. Accepted
//! pairs get a grace buffer after their latest departure so that riders
//! can keep chatting through delays; unconnected trips are retired as
//! soon as their own latest departure is behind us.
//!
//! All departure times are wall-clock values in the reference timezone;
//! the sweep converts them to instants and compares against `Utc::now()`
//! (or an injected clock in tests).

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::CoreConfig;
use crate::domain::{ConnectionStatus, Trip, TripId, TripStatus};
use crate::store::{ConnectionStore, TripStore};

/// Outcome of one sweep run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Trips moved to `Completed`.
    pub trips_completed: usize,
    /// Accepted connections moved to `Completed`.
    pub connections_completed: usize,
    /// Trips promoted from `Pending` to `Active` because they sit under
    /// an accepted connection that is still within its window.
    pub trips_activated: usize,
    /// Records skipped because a referenced trip was missing.
    pub failures: usize,
}

/// Retires expired trips and connections.
#[derive(Clone)]
pub struct Sweeper {
    trips: TripStore,
    connections: ConnectionStore,
    grace: chrono::Duration,
}

/// The latest departure instant across a trip's headline and legs.
pub fn latest_instant(trip: &Trip) -> DateTime<Utc> {
    let mut latest = trip.headline().departs().instant();
    for leg in trip.journey.segments() {
        let instant = leg.departs().instant();
        if instant > latest {
            latest = instant;
        }
    }
    latest
}

impl Sweeper {
    /// Create a sweeper over the shared stores.
    pub fn new(trips: TripStore, connections: ConnectionStore, config: &CoreConfig) -> Self {
        Self {
            trips,
            connections,
            grace: config.completion_grace(),
        }
    }

    /// Run one full sweep at the given instant.
    ///
    /// Two passes: accepted pairs first (grace-buffered), then trips not
    /// under any accepted connection (no buffer). A failure on one record
    /// never aborts the rest of the run.
    pub async fn run(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();
        self.sweep_accepted_pairs(now, &mut report).await;
        self.sweep_unpaired_trips(now, &mut report).await;
        info!(
            trips_completed = report.trips_completed,
            connections_completed = report.connections_completed,
            trips_activated = report.trips_activated,
            failures = report.failures,
            "sweep finished"
        );
        report
    }

    /// Pass 1: every accepted connection, judged by the later of its two
    /// trips' latest departures plus the grace buffer.
    ///
    /// Strictly after the boundary: a pair whose buffer expires exactly
    /// now stays active until the next run.
    async fn sweep_accepted_pairs(&self, now: DateTime<Utc>, report: &mut SweepReport) {
        for connection in self.connections.by_status(ConnectionStatus::Accepted).await {
            let (Some(trip), Some(matched)) = (
                self.trips.get(connection.trip_id).await,
                self.trips.get(connection.matched_trip_id).await,
            ) else {
                warn!(connection = %connection.id, "accepted connection references a missing trip");
                report.failures += 1;
                continue;
            };

            let boundary = latest_instant(&trip).max(latest_instant(&matched)) + self.grace;

            if now > boundary {
                self.complete_trip(trip.id, report).await;
                self.complete_trip(matched.id, report).await;
                self.connections
                    .set_status(connection.id, ConnectionStatus::Completed)
                    .await;
                report.connections_completed += 1;
                debug!(connection = %connection.id, "retired accepted pair");
            } else {
                // Still within the window: both trips must read as active.
                self.activate_trip(&trip, report).await;
                self.activate_trip(&matched, report).await;
            }
        }
    }

    /// Pass 2: trips under no accepted connection, retired without a
    /// buffer once their own latest departure is in the past.
    async fn sweep_unpaired_trips(&self, now: DateTime<Utc>, report: &mut SweepReport) {
        let accepted = self.connections.by_status(ConnectionStatus::Accepted).await;
        let paired = |id: TripId| {
            accepted
                .iter()
                .any(|c| c.trip_id == id || c.matched_trip_id == id)
        };

        for trip in self.trips.all().await {
            if trip.status == TripStatus::Completed || paired(trip.id) {
                continue;
            }
            if now > latest_instant(&trip) {
                self.complete_trip(trip.id, report).await;
                debug!(trip = %trip.id, "retired unpaired trip");
            }
        }
    }

    async fn complete_trip(&self, id: TripId, report: &mut SweepReport) {
        // Count transitions only: a trip that was already completed (say,
        // one shared across two expired pairs) must not inflate the tally.
        let mut was_completed = true;
        self.trips
            .update(id, |t| {
                was_completed = t.status == TripStatus::Completed;
                t.status = TripStatus::Completed;
            })
            .await;
        if !was_completed {
            report.trips_completed += 1;
        }
    }

    async fn activate_trip(&self, trip: &Trip, report: &mut SweepReport) {
        if trip.status == TripStatus::Pending {
            self.trips.set_status(trip.id, TripStatus::Active).await;
            report.trips_activated += 1;
        }
    }
}

/// Spawn the background sweep loop.
///
/// The first tick fires immediately and is skipped so a fresh server does
/// not sweep before it has finished starting up.
pub fn spawn(sweeper: Sweeper, interval_secs: u64) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweeper.run(Utc::now()).await;
        }
    })
}
