//! # credkernel
//!
//! Group arithmetic, credential envelopes, and signature verification for
//! an identity and credential platform.
//!
//! ## Overview
//!
//! - **Groups**: `Z_n^*` with a known or unknown order, elements, and
//!   exponents
//! - **Permissions**: salted commitments that a credential reveals or only
//!   commits to
//! - **Exposed exponents**: the public envelope of a credential, bound to
//!   the issuer's key at a half-hour issuance slot
//! - **Signatures**: unsigned, host-signed, or credential-signed payloads,
//!   tagged with their kind
//!
//! ## Usage
//!
//! ```rust
//! use credkernel::{Verifier, VerifierConfig};
//! use credkernel::core::{BigUint, HostIdentifier, PrivateKey, Time};
//! use credkernel::perms::StaticKeyRetriever;
//! use credkernel::sig::{HostSignature, Signature, Signed};
//!
//! // n = 33, e = 3, d = 7
//! let key = PrivateKey::from_primes(
//!     &BigUint::from(3u32),
//!     &BigUint::from(11u32),
//!     &BigUint::from(3u32),
//! )
//! .unwrap();
//! let host = HostIdentifier::new("example.com").unwrap();
//! let now = Time::now();
//!
//! let verifier = Verifier::new(VerifierConfig::default())
//!     .unwrap()
//!     .with_retriever(StaticKeyRetriever::new().with_key(host.clone(), Time::ZERO, key.public_key()));
//!
//! let signature = Signature::about(host.clone(), now, "hello".to_string());
//! let signed = Signed::Host(
//!     HostSignature::sign_hash(signature, host, &key, &BigUint::from(4u32)).unwrap(),
//! );
//! assert!(verifier.verify_hash(&signed, &BigUint::from(4u32), now).is_ok());
//! ```
//!
//! ## Re-exports
//!
//! - `credkernel::core` - Group arithmetic, keys, identifiers, hashing
//! - `credkernel::perms` - Permissions, exposed exponents, key retrievers
//! - `credkernel::sig` - Signatures and their verification

pub mod config;
pub mod error;
pub mod verifier;

pub use credkernel_core as core;
pub use credkernel_perms as perms;
pub use credkernel_sig as sig;

pub use config::VerifierConfig;
pub use error::{KernelError, Result};
pub use verifier::Verifier;

pub use credkernel_core::{
    BigInt, BigUint, Element, Exponent, Group, GroupWithKnownOrder, GroupWithUnknownOrder, Parameters,
    PrivateKey, PublicKey, Time,
};
pub use credkernel_perms::{
    AgentPermissions, ExposedExponent, HashedOrSaltedAgentPermissions, KeyLookupError,
    PublicKeyRetriever, SaltedAgentPermissions,
};
pub use credkernel_sig::{
    CredentialSignature, HostSignature, SigError, Signature, SignatureConfig, SignatureKind, Signed,
};
