//! Error types for credkernel core.
//!
//! Precondition violations (inverting a non-invertible element, mixing
//! groups) are panics, not variants here. These errors cover malformed
//! inputs and the internal bounds on the sampling loops.

use thiserror::Error;

/// Core errors that can occur during group and key operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid group: {0}")]
    InvalidGroup(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("random element sampling exhausted after {attempts} attempts")]
    SamplingExhausted { attempts: u32 },

    #[error("no relative prime found within {steps} steps")]
    RelativePrimeSearchExhausted { steps: u64 },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
