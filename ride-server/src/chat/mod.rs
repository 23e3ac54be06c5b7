//! Connection chat.
//!
//! The gate decides whether a message may be sent (connection exists,
//! neither trip has completed, sender is under the daily cap) and
//! persists admitted messages; the socket layer fans admitted messages
//! out to everyone in the connection's room over WebSockets.

mod gate;
mod socket;

pub use gate::{ChatError, ChatGate};
pub use socket::{ChatRooms, ClientEvent, RoomEvent, ServerEvent, ws_handler};
