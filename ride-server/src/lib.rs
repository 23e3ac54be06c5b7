//! Student ride-share coordination server.
//!
//! Students post planned trips (direct or multi-leg). The server discovers
//! compatible co-travelers by route, date, departure-time window and mutual
//! gender preference, manages the connection lifecycle between trip owners,
//! gates a rate-limited chat channel to accepted connections, and retires
//! trips and connections once their travel window has passed.

pub mod chat;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod lifecycle;
pub mod store;
pub mod sweep;
pub mod web;
