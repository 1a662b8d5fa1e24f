//! RSA-style host keys over a composite group.
//!
//! The private key knows the order of the composite group and can
//! therefore invert the public exponent. The public key only holds the
//! group with the order dropped.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encoding;
use crate::error::{CoreError, Result};
use crate::exponent::Exponent;
use crate::group::{Group, GroupWithKnownOrder, GroupWithUnknownOrder};

/// Domain for public key fingerprints.
pub const FINGERPRINT_DOMAIN: &str = "credkernel-v0-fingerprint";

/// The usual public exponent.
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65_537;

/// A public key `(n, e)`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyRepr", into = "PublicKeyRepr")]
pub struct PublicKey {
    composite_group: GroupWithUnknownOrder,
    e: Exponent,
}

impl PublicKey {
    /// Create a public key from a modulus and public exponent.
    pub fn new(modulus: BigUint, e: BigUint) -> Result<Self> {
        if modulus <= BigUint::one() {
            return Err(CoreError::InvalidKey("modulus must be greater than one".into()));
        }
        if e.is_zero() {
            return Err(CoreError::InvalidKey("public exponent must be positive".into()));
        }
        Ok(Self {
            composite_group: GroupWithUnknownOrder::new(modulus)?,
            e: Exponent::from(e),
        })
    }

    /// The composite group `Z_n^*`.
    pub fn composite_group(&self) -> &GroupWithUnknownOrder {
        &self.composite_group
    }

    /// The public exponent.
    pub fn e(&self) -> &Exponent {
        &self.e
    }

    /// `value ^ e mod n`.
    pub fn apply(&self, value: &BigUint) -> BigUint {
        self.composite_group
            .get_element(value)
            .pow_exponent(&self.e)
            .into_value()
    }

    /// Short hex digest of `(n, e)`, for logs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new_derive_key(FINGERPRINT_DOMAIN);
        hasher.update(&encoding::to_bytes(self.composite_group.modulus()));
        hasher.update(&encoding::to_bytes(self.e.magnitude()));
        hex::encode(&hasher.finalize().as_bytes()[..8])
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey(n: {} bits, e: {})",
            self.composite_group.modulus().bits(),
            self.e.value()
        )
    }
}

#[derive(Serialize, Deserialize)]
struct PublicKeyRepr {
    #[serde(with = "crate::encoding::biguint_bytes")]
    n: BigUint,
    #[serde(with = "crate::encoding::biguint_bytes")]
    e: BigUint,
}

impl TryFrom<PublicKeyRepr> for PublicKey {
    type Error = CoreError;

    fn try_from(repr: PublicKeyRepr) -> Result<Self> {
        PublicKey::new(repr.n, repr.e)
    }
}

impl From<PublicKey> for PublicKeyRepr {
    fn from(key: PublicKey) -> Self {
        Self {
            n: key.composite_group.modulus().clone(),
            e: key.e.magnitude().clone(),
        }
    }
}

/// A private key: the composite group with its order and the private
/// exponent `d = e^-1 mod order`.
#[derive(Clone)]
pub struct PrivateKey {
    composite_group: GroupWithKnownOrder,
    e: Exponent,
    d: Exponent,
}

impl PrivateKey {
    /// Build a key from two distinct primes and a public exponent.
    ///
    /// The primes are not tested for primality; supplying composites
    /// yields a key whose signatures do not verify.
    pub fn from_primes(p: &BigUint, q: &BigUint, e: &BigUint) -> Result<Self> {
        if p <= &BigUint::one() || q <= &BigUint::one() || p == q {
            return Err(CoreError::InvalidKey(
                "primes must be distinct and greater than one".into(),
            ));
        }
        let modulus = p * q;
        let order = (p - 1u32) * (q - 1u32);
        let composite_group = GroupWithKnownOrder::new(modulus, order)?;

        let e = Exponent::from(e.clone());
        if e.magnitude() <= &BigUint::one() || !e.is_relatively_prime(&composite_group) {
            return Err(CoreError::InvalidKey(
                "public exponent must be coprime to the group order".into(),
            ));
        }
        let d = e.inverse(&composite_group);

        Ok(Self {
            composite_group,
            e,
            d,
        })
    }

    /// The composite group, including its order.
    pub fn composite_group(&self) -> &GroupWithKnownOrder {
        &self.composite_group
    }

    /// The private exponent.
    pub fn d(&self) -> &Exponent {
        &self.d
    }

    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            composite_group: self.composite_group.drop_order(),
            e: self.e.clone(),
        }
    }

    /// `hash ^ d mod n`.
    pub fn sign(&self, hash: &BigUint) -> BigUint {
        self.composite_group
            .get_element(hash)
            .pow_exponent(&self.d)
            .into_value()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({:?})", self.public_key())
    }
}
