//! HTTP and WebSocket surface.

mod auth;
pub mod dto;
mod routes;
mod state;

pub use auth::CurrentUser;
pub use routes::{ApiError, create_router};
pub use state::AppState;
