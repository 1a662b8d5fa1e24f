//! # credkernel core
//!
//! Pure primitives for credkernel: modular arithmetic, RSA-style host keys,
//! and canonical hashing.
//!
//! This crate contains no I/O. It is pure computation over immutable values,
//! so every type here can be shared freely between threads.
//!
//! ## Key Types
//!
//! - [`Group`] - Operations shared by both group handles
//! - [`GroupWithKnownOrder`] / [`GroupWithUnknownOrder`] - Group handles with
//!   and without knowledge of the order
//! - [`Element`] - A value of a group
//! - [`Exponent`] - An integer used to exponentiate elements
//! - [`PublicKey`] / [`PrivateKey`] - Host keys over a composite group
//! - [`Parameters`] - Hash length and loop bounds
//!
//! ## Canonicalization
//!
//! Committed and signed values are hashed over deterministic CBOR. See the
//! [`canonical`] module.

pub mod canonical;
pub mod config;
pub mod crypto;
pub mod element;
pub mod encoding;
pub mod error;
pub mod exponent;
pub mod group;
pub mod types;

pub use canonical::{hash_value, Canonical};
pub use config::Parameters;
pub use crypto::{PrivateKey, PublicKey, DEFAULT_PUBLIC_EXPONENT};
pub use element::Element;
pub use error::{CoreError, Result};
pub use exponent::Exponent;
pub use group::{Group, GroupWithKnownOrder, GroupWithUnknownOrder};
pub use types::{HostIdentifier, Identifier, InternalNonHostIdentifier, SemanticType, Time};

pub use num_bigint::{BigInt, BigUint};
