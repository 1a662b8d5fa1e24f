//! Golden vectors for the RSA-style signature check.
//!
//! Every implementation must agree on these values.

use credkernel::sig::HostSignature;
use credkernel::{BigUint, SigError};
use credkernel_testkit::{all_vectors, verify_all_vectors};

#[test]
fn all_vectors_hold() {
    verify_all_vectors().unwrap();
}

#[test]
fn vectors_through_verify_signature() {
    for vector in all_vectors() {
        let result =
            HostSignature::<()>::verify_signature(&vector.public_key(), &vector.value(), &vector.hash());
        match (vector.valid, result) {
            (true, Ok(())) | (false, Err(SigError::InvalidHostSignature)) => {}
            (valid, other) => panic!("{}: valid = {valid}, got {other:?}", vector.name),
        }
    }
}

#[test]
fn values_encode_as_big_endian_bytes() {
    let vector = all_vectors()
        .into_iter()
        .find(|v| v.name.starts_with("mersenne"))
        .unwrap();
    let value = vector.value();
    assert_eq!(hex::encode(value.to_bytes_be()), vector.value);
    assert_eq!(
        credkernel::core::encoding::to_bytes(&BigUint::from(0u32)),
        Vec::<u8>::new()
    );
}
