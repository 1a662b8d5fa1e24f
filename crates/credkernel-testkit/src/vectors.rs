//! Golden vectors for the RSA-style signature check.
//!
//! Each vector fixes a key, a hash, and a signature value together with
//! whether `value^e mod n == hash` must hold.

use num_bigint::BigUint;

use credkernel_core::{PrivateKey, PublicKey};

/// A prime given compactly.
#[derive(Debug, Clone, Copy)]
pub enum Prime {
    Small(u64),
    /// `2^k - 1`
    Mersenne(u32),
}

impl Prime {
    pub fn value(self) -> BigUint {
        match self {
            Prime::Small(p) => BigUint::from(p),
            Prime::Mersenne(k) => (BigUint::from(1u32) << k) - 1u32,
        }
    }
}

/// A golden signature vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub p: Prime,
    pub q: Prime,
    /// Public exponent.
    pub e: u32,
    /// Hash, big-endian hex.
    pub hash: &'static str,
    /// Signature value, big-endian hex.
    pub value: &'static str,
    /// Whether the value verifies.
    pub valid: bool,
}

impl GoldenVector {
    pub fn private_key(&self) -> PrivateKey {
        PrivateKey::from_primes(&self.p.value(), &self.q.value(), &BigUint::from(self.e))
            .expect("golden vector key is valid")
    }

    pub fn public_key(&self) -> PublicKey {
        self.private_key().public_key()
    }

    pub fn hash(&self) -> BigUint {
        decode_hex(self.hash)
    }

    pub fn value(&self) -> BigUint {
        decode_hex(self.value)
    }
}

fn decode_hex(s: &str) -> BigUint {
    BigUint::from_bytes_be(&hex::decode(s).expect("golden vector hex is valid"))
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "toy key, n = 33, e = 3",
            p: Prime::Small(3),
            q: Prime::Small(11),
            e: 3,
            hash: "04",
            value: "10",
            valid: true,
        },
        GoldenVector {
            name: "toy key, wrong value",
            p: Prime::Small(3),
            q: Prime::Small(11),
            e: 3,
            hash: "04",
            value: "11",
            valid: false,
        },
        GoldenVector {
            name: "toy key, n = 55, e = 3",
            p: Prime::Small(5),
            q: Prime::Small(11),
            e: 3,
            hash: "02",
            value: "12",
            valid: true,
        },
        GoldenVector {
            name: "toy key, n = 3233, e = 17",
            p: Prime::Small(61),
            q: Prime::Small(53),
            e: 17,
            hash: "41",
            value: "024c",
            valid: true,
        },
        GoldenVector {
            name: "toy key, zero hash",
            p: Prime::Small(61),
            q: Prime::Small(53),
            e: 17,
            hash: "",
            value: "",
            valid: true,
        },
        GoldenVector {
            name: "mersenne key, 256-bit hash",
            p: Prime::Mersenne(521),
            q: Prime::Mersenne(607),
            e: 65_537,
            hash: "c0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeeabcd",
            value: "7b97f756646730402311be1b58ee6be126c5c565512e4b71546254506036eca9\
                    eae338e4e66ba31ca82a152c133fcaae359b8a4e08432483ea4f5daed23a2282\
                    47d375fdb5a7d8cbd7b90937c7eb812024f43702c5cf64966046a99c88497943\
                    d7ba5b843bffbfe02c0e0822c05056781f203cbc762a47d373b305ac4be5a783\
                    d8e4d8bf3903f8ac345ba819ba",
            valid: true,
        },
    ]
}

/// Check every vector in both directions: the public check and signing.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        let key = vector.private_key();
        let verifies = key.public_key().apply(&vector.value()) == vector.hash();
        if verifies != vector.valid {
            return Err(format!("{}: expected valid = {}", vector.name, vector.valid));
        }
        if vector.valid && key.sign(&vector.hash()) != vector.value() {
            return Err(format!("{}: signing produced a different value", vector.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors() {
        verify_all_vectors().unwrap();
    }

    #[test]
    fn test_toy_private_exponent() {
        let key = all_vectors()[0].private_key();
        assert_eq!(key.d().magnitude(), &BigUint::from(7u32));
    }
}
