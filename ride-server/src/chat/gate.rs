//! Chat admission gate.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::CoreConfig;
use crate::domain::{ConnectionId, TripId, TripStatus, UserId};
use crate::store::{ConnectionStore, MessageStore, StoredMessage, TripStore};

/// Reasons a message is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The connection id is unknown.
    #[error("connection not found")]
    ConnectionNotFound,

    /// One of the connected trips has completed.
    #[error("Chat is disabled for completed trips.")]
    TripCompleted,

    /// The sender has used up today's allowance on this connection.
    #[error("daily message limit reached")]
    DailyLimitReached,
}

/// Admits or refuses chat messages and persists the admitted ones.
///
/// The daily cap counts persisted messages from this sender on this
/// connection since UTC midnight, so it holds across reconnects and
/// across every socket the sender has open.
#[derive(Clone)]
pub struct ChatGate {
    connections: ConnectionStore,
    trips: TripStore,
    messages: MessageStore,
    daily_cap: usize,
}

impl ChatGate {
    /// Create a gate over the shared stores.
    pub fn new(
        connections: ConnectionStore,
        trips: TripStore,
        messages: MessageStore,
        config: &CoreConfig,
    ) -> Self {
        Self {
            connections,
            trips,
            messages,
            daily_cap: config.daily_message_cap,
        }
    }

    /// Admit and persist one message, or refuse it.
    ///
    /// Checks run in order: the connection must exist, neither of its
    /// trips may be `Completed`, and the sender must be under the daily
    /// cap. A trip that has been deleted does not count as completed.
    pub async fn send(
        &self,
        connection_id: ConnectionId,
        sender: UserId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<StoredMessage, ChatError> {
        let connection = self
            .connections
            .get(connection_id)
            .await
            .ok_or(ChatError::ConnectionNotFound)?;

        if self.trip_completed(connection.trip_id).await
            || self.trip_completed(connection.matched_trip_id).await
        {
            return Err(ChatError::TripCompleted);
        }

        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        let sent_today = self.messages.count_since(connection_id, sender, midnight).await;
        if sent_today >= self.daily_cap {
            debug!(connection = %connection_id, sender = %sender, "daily message cap hit");
            return Err(ChatError::DailyLimitReached);
        }

        Ok(self.messages.append(connection_id, sender, text, now).await)
    }

    /// Message history for a connection, in send order.
    pub async fn history(&self, connection_id: ConnectionId) -> Vec<StoredMessage> {
        self.messages.for_connection(connection_id).await
    }

    async fn trip_completed(&self, id: TripId) -> bool {
        self.trips
            .get(id)
            .await
            .is_some_and(|t| t.status == TripStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Connection, GenderPreference, Journey, Segment, Stop, Trip, WallClock};
    use chrono::{NaiveDate, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    fn trip(status: TripStatus) -> Trip {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let segment = Segment::new(
            Stop::parse("Delhi").unwrap(),
            Stop::parse("Jaipur").unwrap(),
            WallClock::parse_hhmm("09:00", date).unwrap(),
        );
        Trip::new(
            UserId::new(),
            Journey::direct(segment),
            GenderPreference::Any,
            status,
            Utc::now(),
        )
    }

    struct Fixture {
        trips: TripStore,
        gate: ChatGate,
        connection: Connection,
    }

    async fn fixture(a_status: TripStatus, b_status: TripStatus) -> Fixture {
        let trips = TripStore::new();
        let connections = ConnectionStore::new();
        let messages = MessageStore::new();

        let a = trip(a_status);
        let b = trip(b_status);
        let mut connection =
            Connection::pending(a.id, b.id, a.owner, b.owner, Utc::now());
        connection.status = crate::domain::ConnectionStatus::Accepted;
        trips.insert(a).await;
        trips.insert(b).await;
        connections.insert(connection.clone()).await;

        let gate = ChatGate::new(connections, trips.clone(), messages, &CoreConfig::default());
        Fixture {
            trips,
            gate,
            connection,
        }
    }

    #[tokio::test]
    async fn admits_and_persists() {
        let fx = fixture(TripStatus::Active, TripStatus::Active).await;
        let sender = fx.connection.from_user;

        let stored = fx
            .gate
            .send(fx.connection.id, sender, "on my way", at(9, 0))
            .await
            .unwrap();
        assert_eq!(stored.text, "on my way");

        let history = fx.gate.history(fx.connection.id).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, sender);
    }

    #[tokio::test]
    async fn unknown_connection_is_refused() {
        let fx = fixture(TripStatus::Active, TripStatus::Active).await;
        let err = fx
            .gate
            .send(ConnectionId::new(), fx.connection.from_user, "hi", at(9, 0))
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::ConnectionNotFound);
    }

    #[tokio::test]
    async fn completed_trip_disables_chat() {
        // Either side completing is enough.
        let fx = fixture(TripStatus::Active, TripStatus::Completed).await;
        let err = fx
            .gate
            .send(fx.connection.id, fx.connection.from_user, "hi", at(9, 0))
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::TripCompleted);
        assert_eq!(err.to_string(), "Chat is disabled for completed trips.");
    }

    #[tokio::test]
    async fn missing_trip_does_not_count_as_completed() {
        let fx = fixture(TripStatus::Active, TripStatus::Active).await;
        fx.trips.remove(fx.connection.matched_trip_id).await;

        assert!(
            fx.gate
                .send(fx.connection.id, fx.connection.from_user, "hi", at(9, 0))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn cap_applies_per_sender_per_utc_day() {
        let fx = fixture(TripStatus::Active, TripStatus::Active).await;
        let sender = fx.connection.from_user;
        let other = fx.connection.to_user;

        for i in 0..20 {
            fx.gate
                .send(fx.connection.id, sender, format!("msg {i}"), at(9, i))
                .await
                .unwrap();
        }

        // Message 21 is over the cap.
        let err = fx
            .gate
            .send(fx.connection.id, sender, "one more", at(9, 30))
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::DailyLimitReached);

        // The other party has their own allowance.
        assert!(fx.gate.send(fx.connection.id, other, "hi", at(9, 31)).await.is_ok());
    }

    #[tokio::test]
    async fn cap_resets_at_utc_midnight() {
        let fx = fixture(TripStatus::Active, TripStatus::Active).await;
        let sender = fx.connection.from_user;

        for i in 0..20 {
            fx.gate
                .send(fx.connection.id, sender, format!("msg {i}"), at(23, i))
                .await
                .unwrap();
        }
        assert!(
            fx.gate
                .send(fx.connection.id, sender, "blocked", at(23, 30))
                .await
                .is_err()
        );

        // Next UTC day, the count starts over.
        let next_day = Utc.with_ymd_and_hms(2024, 5, 2, 0, 5, 0).unwrap();
        assert!(
            fx.gate
                .send(fx.connection.id, sender, "fresh allowance", next_day)
                .await
                .is_ok()
        );
    }
}
