//! Domain types for the ride-share coordinator.
//!
//! This module contains the core domain model types that represent
//! validated travel data. Types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod connection;
mod error;
mod gender;
mod journey;
mod schedule;
mod segment;
mod stop;
mod trip;
mod user;

pub use connection::{Connection, ConnectionId, ConnectionStatus};
pub use error::DomainError;
pub use gender::{Gender, GenderPreference};
pub use journey::Journey;
pub use schedule::{IST_OFFSET_SECS, InvalidTime, WallClock, reference_offset};
pub use segment::Segment;
pub use stop::{InvalidStop, Stop};
pub use trip::{Trip, TripId, TripStatus};
pub use user::{User, UserId};
