//! Trip store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Trip, TripId, TripStatus, UserId};

/// Thread-safe trip store.
///
/// Listing methods return snapshots ordered by creation time so that
/// discovery scan order (and therefore result bucket order) is stable.
#[derive(Clone, Default)]
pub struct TripStore {
    inner: Arc<RwLock<HashMap<TripId, Trip>>>,
}

impl TripStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a trip, replacing any previous record with the same id.
    pub async fn insert(&self, trip: Trip) {
        let mut guard = self.inner.write().await;
        guard.insert(trip.id, trip);
    }

    /// Look up a trip by id.
    pub async fn get(&self, id: TripId) -> Option<Trip> {
        let guard = self.inner.read().await;
        guard.get(&id).cloned()
    }

    /// Snapshot of every trip, ordered by creation time.
    pub async fn all(&self) -> Vec<Trip> {
        let guard = self.inner.read().await;
        let mut trips: Vec<Trip> = guard.values().cloned().collect();
        trips.sort_by_key(|t| (t.created_at, t.id.to_string()));
        trips
    }

    /// Snapshot of one user's trips, ordered by creation time.
    pub async fn by_owner(&self, owner: UserId) -> Vec<Trip> {
        let guard = self.inner.read().await;
        let mut trips: Vec<Trip> = guard.values().filter(|t| t.owner == owner).cloned().collect();
        trips.sort_by_key(|t| (t.created_at, t.id.to_string()));
        trips
    }

    /// Apply an in-place edit to a trip. Returns the updated trip, or
    /// `None` if the id is unknown.
    pub async fn update<F>(&self, id: TripId, edit: F) -> Option<Trip>
    where
        F: FnOnce(&mut Trip),
    {
        let mut guard = self.inner.write().await;
        let trip = guard.get_mut(&id)?;
        edit(trip);
        Some(trip.clone())
    }

    /// Set a trip's lifecycle status. Returns false if the id is unknown.
    pub async fn set_status(&self, id: TripId, status: TripStatus) -> bool {
        let mut guard = self.inner.write().await;
        match guard.get_mut(&id) {
            Some(trip) => {
                trip.status = status;
                true
            }
            None => false,
        }
    }

    /// Delete a trip, returning the removed record if it existed.
    pub async fn remove(&self, id: TripId) -> Option<Trip> {
        let mut guard = self.inner.write().await;
        guard.remove(&id)
    }

    /// Number of stored trips.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// True if no trips are stored.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenderPreference, Journey, Segment, Stop, WallClock};
    use chrono::{NaiveDate, Utc};

    fn trip(owner: UserId) -> Trip {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let segment = Segment::new(
            Stop::parse("Delhi").unwrap(),
            Stop::parse("Jaipur").unwrap(),
            WallClock::parse_hhmm("09:00", date).unwrap(),
        );
        Trip::new(
            owner,
            Journey::direct(segment),
            GenderPreference::Any,
            TripStatus::Pending,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = TripStore::new();
        let t = trip(UserId::new());
        store.insert(t.clone()).await;
        assert_eq!(store.get(t.id).await, Some(t));
    }

    #[tokio::test]
    async fn get_unknown_is_none() {
        let store = TripStore::new();
        assert_eq!(store.get(TripId::new()).await, None);
    }

    #[tokio::test]
    async fn by_owner_filters() {
        let store = TripStore::new();
        let alice = UserId::new();
        let bob = UserId::new();
        store.insert(trip(alice)).await;
        store.insert(trip(alice)).await;
        store.insert(trip(bob)).await;

        assert_eq!(store.by_owner(alice).await.len(), 2);
        assert_eq!(store.by_owner(bob).await.len(), 1);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn set_status_updates_in_place() {
        let store = TripStore::new();
        let t = trip(UserId::new());
        store.insert(t.clone()).await;

        assert!(store.set_status(t.id, TripStatus::Active).await);
        assert_eq!(store.get(t.id).await.unwrap().status, TripStatus::Active);

        assert!(!store.set_status(TripId::new(), TripStatus::Active).await);
    }

    #[tokio::test]
    async fn remove_returns_record() {
        let store = TripStore::new();
        let t = trip(UserId::new());
        store.insert(t.clone()).await;

        assert_eq!(store.remove(t.id).await, Some(t.clone()));
        assert_eq!(store.remove(t.id).await, None);
        assert!(store.is_empty().await);
    }
}
