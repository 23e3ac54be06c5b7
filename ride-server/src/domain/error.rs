//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They
//! are distinct from web/transport errors and map to 400 responses.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Connected journey declared with no legs
    #[error("legs must be provided for connected trips")]
    EmptyConnectedJourney,

    /// First leg does not start where the trip starts
    #[error("first leg origin must match the trip origin")]
    FirstLegOriginMismatch,

    /// Last leg does not end where the trip ends
    #[error("last leg destination must match the trip destination")]
    LastLegDestinationMismatch,
}
