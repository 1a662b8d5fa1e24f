//! Proptest generators for property-based testing.

use num_bigint::BigUint;
use proptest::prelude::*;

use credkernel_core::{
    Element, Group, GroupWithKnownOrder, GroupWithUnknownOrder, SemanticType, Time,
};
use credkernel_perms::AgentPermissions;

/// Primes small enough for exhaustive checks.
pub const SMALL_PRIMES: &[u64] = &[
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199,
];

/// A small prime.
pub fn small_prime() -> impl Strategy<Value = u64> {
    prop::sample::select(SMALL_PRIMES)
}

/// Two distinct small primes.
pub fn distinct_primes() -> impl Strategy<Value = (u64, u64)> {
    (small_prime(), small_prime()).prop_filter("primes must differ", |(p, q)| p != q)
}

/// A modulus of at least 2.
pub fn modulus() -> impl Strategy<Value = u64> {
    2u64..1_000_000
}

/// A group with unknown order.
pub fn group() -> impl Strategy<Value = GroupWithUnknownOrder> {
    modulus().prop_map(|m| GroupWithUnknownOrder::new(BigUint::from(m)).expect("modulus is positive"))
}

/// `Z_{pq}^*` with its order `(p - 1)(q - 1)`.
pub fn composite_group() -> impl Strategy<Value = GroupWithKnownOrder> {
    distinct_primes().prop_map(|(p, q)| {
        GroupWithKnownOrder::new(BigUint::from(p * q), BigUint::from((p - 1) * (q - 1)))
            .expect("modulus and order are positive")
    })
}

/// A group together with one of its elements, from an arbitrary value.
pub fn group_and_element() -> impl Strategy<Value = (GroupWithUnknownOrder, Element)> {
    (group(), any::<u64>()).prop_map(|(group, value)| {
        let element = group.get_element(&BigUint::from(value));
        (group, element)
    })
}

/// A valid semantic type such as `abc@xyz.example.com`.
pub fn semantic_type() -> impl Strategy<Value = SemanticType> {
    "[a-z]{1,8}@[a-z]{1,8}\\.example\\.com"
        .prop_map(|s| SemanticType::new(s).expect("pattern yields valid semantic types"))
}

/// A permission set of up to `max_len` entries.
pub fn permissions(max_len: usize) -> impl Strategy<Value = AgentPermissions> {
    prop::collection::vec((semantic_type(), any::<bool>()), 0..=max_len)
        .prop_map(|entries| entries.into_iter().collect())
}

/// A positive multiple of half an hour.
pub fn issuance() -> impl Strategy<Value = Time> {
    (1i64..1_000_000)
        .prop_map(|slots| Time::from_millis(slots * Time::HALF_HOUR.as_millis()))
}
