//! Core error types for the referral board.
//!
//! Nothing in here is fatal to a live view. Malformed upstream documents are
//! reported as [`MalformedEvent`] and dropped by the synchronizer; the root
//! [`Error`] covers configuration and lookups done by hosts.

use thiserror::Error;

use crate::live::ChangeKind;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed change event: {0}")]
    Malformed(#[from] MalformedEvent),

    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    #[error("Input validation failed: {0}")]
    Validation(String),
}

/// A change event that cannot be applied to a view.
///
/// Produced while decoding raw documents or validating typed events. The
/// event is dropped; the rest of its batch still applies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedEvent {
    #[error("{kind} event has no document id")]
    MissingId { kind: ChangeKind },

    #[error("{kind} event for '{id}' carries no document fields")]
    MissingData { kind: ChangeKind, id: String },

    #[error("document '{id}' could not be decoded: {reason}")]
    Invalid { id: String, reason: String },
}

impl MalformedEvent {
    /// Document id the diagnostic refers to, if one was present.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::MissingId { .. } => None,
            Self::MissingData { id, .. } | Self::Invalid { id, .. } => Some(id.as_str()),
        }
    }
}
