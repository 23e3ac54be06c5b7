//! User store.
//!
//! Read-mostly reference data: seeded at startup, queried for ownership
//! checks and for populating match results with owner name and gender.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{User, UserId};

/// Thread-safe user lookup.
#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<HashMap<UserId, User>>>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user record.
    pub async fn insert(&self, user: User) {
        let mut guard = self.inner.write().await;
        guard.insert(user.id, user);
    }

    /// Look up a user by id.
    pub async fn get(&self, id: UserId) -> Option<User> {
        let guard = self.inner.read().await;
        guard.get(&id).cloned()
    }

    /// Number of known users.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// True if no users are known.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    #[tokio::test]
    async fn insert_and_get() {
        let store = UserStore::new();
        let user = User::new(UserId::new(), "Asha", Some(Gender::Female));
        store.insert(user.clone()).await;
        assert_eq!(store.get(user.id).await, Some(user));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn get_unknown_is_none() {
        let store = UserStore::new();
        assert!(store.get(UserId::new()).await.is_none());
        assert!(store.is_empty().await);
    }
}
