//! Error types for signature verification.
//!
//! Every variant describes a message that must be rejected. None of them
//! indicates a defect in the engine itself.

use thiserror::Error;

use credkernel_core::{CoreError, HostIdentifier, Time};
use credkernel_perms::{KeyLookupError, PermsError};

use crate::kind::SignatureKind;

/// Errors that can occur while signing or verifying.
#[derive(Debug, Error)]
pub enum SigError {
    #[error("invalid host signature")]
    InvalidHostSignature,

    #[error("invalid credentials signature")]
    InvalidCredentialsSignature,

    #[error("signature from {time} has expired")]
    ExpiredSignature { time: Time },

    #[error("host signature by {signer} from {time} has expired")]
    ExpiredHostSignature { signer: HostIdentifier, time: Time },

    #[error("signer {signer} is inactive")]
    InactiveSignature { signer: HostIdentifier },

    #[error("signature is missing its {0}")]
    MissingField(&'static str),

    #[error("unknown signature kind tag: {0}")]
    UnknownKind(u8),

    #[error("{0:?} signatures are not accepted here")]
    Unsupported(SignatureKind),

    #[error("key lookup error: {0}")]
    KeyLookup(#[from] KeyLookupError),

    #[error("credential error: {0}")]
    Credential(#[from] PermsError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl SigError {
    /// Whether verifying again later could succeed.
    ///
    /// Only transient key lookup failures qualify; everything else is a
    /// property of the message.
    pub fn is_retryable(&self) -> bool {
        match self {
            SigError::KeyLookup(e) => e.is_retryable(),
            SigError::Credential(PermsError::KeyLookup(e)) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for signature operations.
pub type Result<T> = std::result::Result<T, SigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_only_for_unavailable() {
        let host = HostIdentifier::new("example.com").unwrap();
        let unavailable = KeyLookupError::Unavailable {
            host: host.clone(),
            reason: "timeout".into(),
        };

        assert!(SigError::KeyLookup(unavailable.clone()).is_retryable());
        assert!(SigError::Credential(PermsError::KeyLookup(unavailable)).is_retryable());
        assert!(!SigError::KeyLookup(KeyLookupError::NotFound {
            host,
            time: Time::HALF_HOUR
        })
        .is_retryable());
        assert!(!SigError::InvalidHostSignature.is_retryable());
    }
}
