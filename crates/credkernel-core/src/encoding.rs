//! Serde support for big integers.
//!
//! Every big-integer field travels as an unsigned big-endian byte string.
//! Use with `#[serde(with = "credkernel_core::encoding::biguint_bytes")]`.
//! Exponents may be negative and travel as two's-complement bytes instead.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

/// Encode a big integer as minimal unsigned big-endian bytes.
///
/// Zero encodes as the empty string.
pub fn to_bytes(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

/// Decode unsigned big-endian bytes. Leading zero bytes are accepted.
pub fn from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Encode a signed integer as minimal two's-complement big-endian bytes.
///
/// Zero encodes as the empty string, like its unsigned counterpart.
pub fn to_signed_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_signed_bytes_be()
    }
}

/// Decode two's-complement big-endian bytes.
pub fn from_signed_bytes(bytes: &[u8]) -> BigInt {
    BigInt::from_signed_bytes_be(bytes)
}

mod raw {
    use std::fmt;

    use serde::de::{self, SeqAccess, Visitor};
    use serde::Deserializer;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        deserializer.deserialize_bytes(BytesVisitor)
    }

    struct BytesVisitor;

    impl<'de> Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("big-endian integer bytes")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Vec<u8>, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Vec<u8>, E> {
            Ok(v)
        }

        // Self-describing text formats (JSON) hand us a sequence instead.
        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<u8>, A::Error> {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(b) = seq.next_element::<u8>()? {
                bytes.push(b);
            }
            Ok(bytes)
        }
    }
}

/// `#[serde(with = ...)]` module for `BigUint` fields.
pub mod biguint_bytes {
    use num_bigint::BigUint;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&super::to_bytes(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        super::raw::deserialize(deserializer).map(|bytes| super::from_bytes(&bytes))
    }
}

/// `#[serde(with = ...)]` module for `BigInt` fields.
pub mod bigint_bytes {
    use num_bigint::BigInt;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&super::to_signed_bytes(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        super::raw::deserialize(deserializer).map(|bytes| super::from_signed_bytes(&bytes))
    }
}

/// `#[serde(with = ...)]` module for `Option<BigUint>` fields.
pub mod option_biguint_bytes {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Wrapped(#[serde(with = "super::biguint_bytes")] BigUint);

    pub fn serialize<S: Serializer>(
        value: &Option<BigUint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.clone().map(Wrapped).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigUint>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
    }
}
