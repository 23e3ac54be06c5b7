//! Co-traveler discovery.
//!
//! Answers: "who else is making this journey?" The evaluator decides
//! whether two segments are the same journey within the departure-time
//! tolerance and whether two travelers mutually accept each other; the
//! engine expands a trip into its comparable segments, runs the evaluator
//! against the candidate pool, and groups results per leg.

mod compat;
mod engine;

pub use compat::{mutual_gender, segments_match};
pub use engine::{DiscoveryEngine, DiscoveryError, LegMatches, MatchedTrip};
