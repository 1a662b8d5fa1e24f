//! Error types for the verifier.

use credkernel_core::CoreError;
use credkernel_perms::{KeyLookupError, PermsError};
use credkernel_sig::SigError;
use thiserror::Error;

/// Errors that can occur during verifier operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Permission or credential error.
    #[error("permission error: {0}")]
    Perms(#[from] PermsError),

    /// Signature rejected.
    #[error("signature error: {0}")]
    Sig(#[from] SigError),

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl KernelError {
    /// Whether the operation could succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        match self {
            KernelError::Sig(e) => e.is_retryable(),
            KernelError::Perms(PermsError::KeyLookup(e)) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<KeyLookupError> for KernelError {
    fn from(e: KeyLookupError) -> Self {
        KernelError::Sig(SigError::KeyLookup(e))
    }
}

/// Result type for verifier operations.
pub type Result<T> = std::result::Result<T, KernelError>;
