//! Error types for the permissions module.

use thiserror::Error;

use credkernel_core::{HostIdentifier, Time};

/// Errors that can occur while looking up a public key.
///
/// The variants keep "this key does not exist" apart from "the lookup could
/// not be completed right now" so callers can choose between rejecting and
/// retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyLookupError {
    /// No key exists for the host at that time. Permanent.
    #[error("no public key for {host} at {time}")]
    NotFound { host: HostIdentifier, time: Time },

    /// The lookup failed for a reason that may go away. Transient.
    #[error("public key lookup for {host} unavailable: {reason}")]
    Unavailable { host: HostIdentifier, reason: String },

    /// No retriever was configured.
    #[error("no public key retriever configured")]
    NoRetriever,
}

impl KeyLookupError {
    /// Whether retrying the lookup later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, KeyLookupError::Unavailable { .. })
    }
}

/// Errors that can occur during permission operations.
#[derive(Debug, Error)]
pub enum PermsError {
    /// Both or neither of salted permissions and stored hash are present.
    #[error("exactly one of salted permissions and stored hash must be present")]
    InvalidCommitment,

    /// Issuance time is not a positive multiple of half an hour.
    #[error("issuance {0} is not a positive multiple of half an hour")]
    InvalidIssuance(Time),

    /// Public key lookup failed.
    #[error("key lookup error: {0}")]
    KeyLookup(#[from] KeyLookupError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Core error.
    #[error("core error: {0}")]
    CoreError(#[from] credkernel_core::CoreError),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
