//! # credkernel testkit
//!
//! Testing utilities for credkernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: fixed keys, hashes, and signature values
//! - **Generators**: Proptest strategies for groups, elements, and permissions
//! - **Fixtures**: a host with a registered key, ready to sign and issue
//!
//! ## Golden Vectors
//!
//! ```rust
//! use credkernel_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let verifies = vector.public_key().apply(&vector.value()) == vector.hash();
//!     assert_eq!(verifies, vector.valid, "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use credkernel_testkit::generators::group_and_element;
//!
//! proptest! {
//!     #[test]
//!     fn element_is_reduced((group, element) in group_and_element()) {
//!         prop_assert!(element.value() < group.modulus());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use credkernel_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let signed = fixture.host_signed("hello".to_string());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{fixed_now, large_key, read_permissions, toy_key, TestFixture};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector, Prime};
