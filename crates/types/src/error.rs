//! Error taxonomy for disk observation

use thiserror::Error;

/// Failure to interpret a raw disk description
///
/// Always recoverable: the offending event is dropped and observation
/// of other devices continues. Never surfaced to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptionError {
    /// The volume-identity entry is absent, of the wrong underlying
    /// type, or cannot be rendered as a valid UUID
    #[error("description carries no resolvable volume identity")]
    IdentityUnresolvable,

    /// A required descriptive field is missing or mistyped
    #[error("description is missing required field: {field}")]
    Incomplete {
        /// The description key that failed to resolve
        field: &'static str,
    },
}

/// Failure to establish or operate the OS observation session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The OS session could not be created
    #[error("session could not be created: {0}")]
    StartFailed(String),

    /// The adapter lost its delivery channel
    #[error("session delivery channel closed: {0}")]
    ChannelClosed(String),
}

/// Abnormal-termination payload of the device-set stream
///
/// Not raised by the reconciler in normal operation; reserved so a
/// fatal integration fault is distinguishable from a routine
/// empty-set update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountObservationError {
    /// The observation session failed irrecoverably
    #[error("observation session lost: {0}")]
    SessionLost(String),
}
