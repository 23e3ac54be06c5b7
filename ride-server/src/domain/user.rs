//! User reference data.
//!
//! Registration, authentication and profile management live outside this
//! service; it only needs each user's id, display name and declared
//! gender for ownership checks and match display.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Gender;

/// Opaque user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        UserId(Uuid::new_v4())
    }

    /// Parse an id from its string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(UserId)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A traveler known to the coordinator.
///
/// `declared_gender` may be absent for accounts that never completed
/// their profile; such users fail gender matching closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub declared_gender: Option<Gender>,
}

impl User {
    /// Create a user record.
    pub fn new(id: UserId, name: impl Into<String>, declared_gender: Option<Gender>) -> Self {
        Self {
            id,
            name: name.into(),
            declared_gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_roundtrip() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn user_id_parse_rejects_garbage() {
        assert!(UserId::parse("not-a-uuid").is_err());
    }
}
