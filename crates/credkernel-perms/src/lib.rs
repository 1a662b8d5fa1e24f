//! # credkernel permissions
//!
//! Permission commitments and the public envelope of credentials.
//!
//! ## Overview
//!
//! A credential states which attribute types its holder may read or write.
//! Those permissions are committed to with a salted hash. The credential
//! can then either reveal them or carry only the commitment:
//!
//! - **AgentPermissions**: the permission set itself
//! - **SaltedAgentPermissions**: permissions plus a fresh random salt
//! - **HashedOrSaltedAgentPermissions**: either the salted permissions or
//!   only their hash
//! - **ExposedExponent**: issuer, issuance slot, permission commitment, and
//!   optional role or attribute content
//!
//! ## Key lookup
//!
//! An exposed exponent derives its issuer's public key through an injected
//! [`PublicKeyRetriever`]. Lookup errors keep "not found" and "unavailable"
//! apart; see [`KeyLookupError::is_retryable`].
//!
//! ## Usage
//!
//! ```rust
//! use credkernel_core::{InternalNonHostIdentifier, Parameters, SemanticType, Time};
//! use credkernel_perms::{AgentPermissions, ExposedExponent, HashedOrSaltedAgentPermissions};
//!
//! let permissions = AgentPermissions::none()
//!     .with(SemanticType::new("email@core.example.com").unwrap(), false);
//! let covered = HashedOrSaltedAgentPermissions::with(permissions, false, &Parameters::default());
//!
//! let exposed = ExposedExponent::builder(
//!     InternalNonHostIdentifier::new("alice@example.com").unwrap(),
//!     Time::from_millis(1_700_000_000_000).round_down(Time::HALF_HOUR),
//!     covered,
//! )
//! .build()
//! .unwrap();
//!
//! assert!(exposed.is_identity_based());
//! ```

pub mod error;
pub mod exposed;
pub mod permissions;
pub mod retriever;
pub mod salted;

pub use error::{KeyLookupError, PermsError, Result};
pub use exposed::{ExposedExponent, ExposedExponentBuilder};
pub use permissions::AgentPermissions;
pub use retriever::{CachingRetriever, NoRetriever, PublicKeyRetriever, StaticKeyRetriever};
pub use salted::{HashedOrSaltedAgentPermissions, SaltedAgentPermissions};
