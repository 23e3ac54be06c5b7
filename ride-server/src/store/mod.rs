//! Shared in-process stores.
//!
//! Each store is a cheaply clonable handle around `Arc<RwLock<...>>`
//! shared between the request handlers and the background sweep task.
//! Reads take a snapshot; individual updates are last-write-wins. The
//! stores are the single source of truth and the seam where an external
//! database would sit.

mod connections;
mod messages;
mod trips;
mod users;

pub use connections::ConnectionStore;
pub use messages::{MessageStore, StoredMessage};
pub use trips::TripStore;
pub use users::UserStore;
