//! # credkernel signatures
//!
//! Signed payloads and their verification.
//!
//! - **Signature**: subject, time, and element, unsigned
//! - **HostSignature**: signed with a host's RSA-style key
//! - **CredentialSignature**: signed under a credential's exposed exponent
//! - **Signed**: any of the above, tagged with its [`SignatureKind`]
//!
//! Verification failures are values of [`SigError`]. Only lookup failures
//! that may clear up report [`SigError::is_retryable`].

pub mod config;
pub mod credential;
pub mod error;
pub mod host;
pub mod kind;
pub mod signature;
pub mod signed;

pub use config::SignatureConfig;
pub use credential::{credential_hash, CredentialSignature, CREDENTIAL_DOMAIN};
pub use error::{Result, SigError};
pub use host::HostSignature;
pub use kind::SignatureKind;
pub use signature::Signature;
pub use signed::Signed;
