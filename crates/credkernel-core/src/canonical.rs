//! Canonical CBOR encoding and hashing to big integers.
//!
//! Everything that gets signed or committed to is hashed over its
//! canonical encoding (RFC 8949 Core Deterministic Encoding):
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! Hashes are domain-separated BLAKE3 outputs read as unsigned big-endian
//! integers, so they can be used directly as group values.

use ciborium::value::Value;
use num_bigint::BigUint;
use serde::Serialize;

use crate::encoding;
use crate::error::{CoreError, Result};

/// Domain for hashing signed payloads.
pub const PAYLOAD_DOMAIN: &str = "credkernel-v0-payload";

/// Types with a canonical CBOR representation.
pub trait Canonical {
    /// Build the CBOR value that is hashed for this type.
    fn to_cbor_value(&self) -> Value;

    /// Canonical bytes of [`to_cbor_value`](Self::to_cbor_value).
    fn canonical_bytes(&self) -> Result<Vec<u8>> {
        encode_canonical(&self.to_cbor_value())
    }
}

/// A CBOR value for an unsigned integer key.
pub fn key(k: u64) -> Value {
    Value::Integer(k.into())
}

/// A CBOR byte string holding a big integer.
pub fn biguint_value(n: &BigUint) -> Value {
    Value::Bytes(encoding::to_bytes(n))
}

/// A CBOR value for an optional field; absent fields encode as null.
pub fn optional<T>(value: Option<T>, f: impl FnOnce(T) -> Value) -> Value {
    value.map(f).unwrap_or(Value::Null)
}

/// Encode a CBOR value canonically.
pub fn encode_canonical(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Canonically encode any serializable value.
pub fn encode_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let value = Value::serialized(value).map_err(|e| CoreError::EncodingError(e.to_string()))?;
    encode_canonical(&value)
}

/// Hash bytes under `domain` to a 256-bit integer.
pub fn hash_bytes(domain: &str, bytes: &[u8]) -> BigUint {
    let mut hasher = blake3::Hasher::new_derive_key(domain);
    hasher.update(bytes);
    BigUint::from_bytes_be(hasher.finalize().as_bytes())
}

/// Hash the canonical encoding of a serializable value.
///
/// Stands in for the wire layer when a payload hash is needed.
pub fn hash_value<T: Serialize + ?Sized>(value: &T) -> Result<BigUint> {
    Ok(hash_bytes(PAYLOAD_DOMAIN, &encode_serializable(value)?))
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Integer(i) => {
            let n = i128::from(*i);
            if n >= 0 {
                write_head(buf, 0, n as u64);
            } else {
                // -1 - n, so -1 encodes as 0
                write_head(buf, 1, (-1 - n) as u64);
            }
        }
        Value::Bytes(bytes) => {
            write_head(buf, 2, bytes.len() as u64);
            buf.extend_from_slice(bytes);
        }
        Value::Text(text) => {
            write_head(buf, 3, text.len() as u64);
            buf.extend_from_slice(text.as_bytes());
        }
        Value::Array(items) => {
            write_head(buf, 4, items.len() as u64);
            for item in items {
                encode_value_to(buf, item)?;
            }
        }
        Value::Map(entries) => encode_sorted_map(buf, entries)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::EncodingError(
                "floats have no canonical encoding".into(),
            ))
        }
        other => {
            return Err(CoreError::EncodingError(format!(
                "cannot canonically encode {other:?}"
            )))
        }
    }
    Ok(())
}

/// Write a major type and its argument in the shortest form.
fn write_head(buf: &mut Vec<u8>, major: u8, arg: u64) {
    let major = major << 5;
    match arg {
        0..=23 => buf.push(major | arg as u8),
        24..=0xff => buf.extend_from_slice(&[major | 24, arg as u8]),
        0x100..=0xffff => {
            buf.push(major | 25);
            buf.extend_from_slice(&(arg as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(major | 26);
            buf.extend_from_slice(&(arg as u32).to_be_bytes());
        }
        _ => {
            buf.push(major | 27);
            buf.extend_from_slice(&arg.to_be_bytes());
        }
    }
}

/// Maps are written with entries ordered by the bytes of their encoded keys.
fn encode_sorted_map(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<()> {
    let mut encoded = entries
        .iter()
        .map(|(k, v)| {
            let mut key_bytes = Vec::new();
            encode_value_to(&mut key_bytes, k).map(|()| (key_bytes, v))
        })
        .collect::<Result<Vec<_>>>()?;
    encoded.sort_by(|(a, _), (b, _)| a.cmp(b));

    write_head(buf, 5, encoded.len() as u64);
    for (key_bytes, v) in encoded {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, v)?;
    }
    Ok(())
}
