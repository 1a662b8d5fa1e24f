//! Exponents: bare integers used to exponentiate group elements.

use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed};
use serde::{Deserialize, Serialize};

use crate::config::Parameters;
use crate::error::{CoreError, Result};
use crate::group::GroupWithKnownOrder;

/// A signed integer exponent.
///
/// Addition, subtraction and multiplication need no group and never fail;
/// blinded responses such as `r - c * x` are routinely negative. Inversion
/// and the coprimality search work modulo a group *order*, so they take a
/// [`GroupWithKnownOrder`] and return non-negative values.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Exponent(#[serde(with = "crate::encoding::bigint_bytes")] BigInt);

impl Exponent {
    /// Create an exponent from its value.
    pub fn new(value: BigInt) -> Self {
        Self(value)
    }

    /// The value of this exponent.
    pub fn value(&self) -> &BigInt {
        &self.0
    }

    /// Consume the exponent and return its value.
    pub fn into_value(self) -> BigInt {
        self.0
    }

    /// The absolute value.
    pub fn magnitude(&self) -> &BigUint {
        self.0.magnitude()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// The representative of this exponent in `[0, modulus)`.
    pub fn reduce(&self, modulus: &BigUint) -> BigUint {
        let modulus = BigInt::from_biguint(Sign::Plus, modulus.clone());
        // mod_floor takes the sign of the divisor, so this is never negative.
        self.0.mod_floor(&modulus).into_parts().1
    }

    pub fn add(&self, other: &Exponent) -> Exponent {
        Self(&self.0 + &other.0)
    }

    pub fn subtract(&self, other: &Exponent) -> Exponent {
        Self(&self.0 - &other.0)
    }

    pub fn multiply(&self, other: &Exponent) -> Exponent {
        Self(&self.0 * &other.0)
    }

    /// Whether the exponent is coprime to the order of `group`.
    pub fn is_relatively_prime(&self, group: &GroupWithKnownOrder) -> bool {
        self.magnitude().gcd(group.order()).is_one()
    }

    /// The inverse of this exponent modulo the order of `group`, in
    /// `[0, order)`.
    ///
    /// # Panics
    ///
    /// If the exponent is not relatively prime to the order.
    pub fn inverse(&self, group: &GroupWithKnownOrder) -> Exponent {
        match self.reduce(group.order()).modinv(group.order()) {
            Some(inverse) => Self::from(inverse),
            None => panic!("exponent is not relatively prime to the group order"),
        }
    }

    /// The smallest value `>= self` that is relatively prime to the order.
    ///
    /// Returns `self` unchanged when it already is. A negative exponent is
    /// first reduced modulo the order, so the result is never negative.
    /// The search gives up after `params.max_relative_prime_steps`
    /// candidates.
    pub fn get_next_relative_prime(
        &self,
        group: &GroupWithKnownOrder,
        params: &Parameters,
    ) -> Result<Exponent> {
        let mut candidate = match self.0.to_biguint() {
            Some(value) => value,
            None => self.reduce(group.order()),
        };
        for _ in 0..params.max_relative_prime_steps {
            if candidate.gcd(group.order()).is_one() {
                return Ok(Self::from(candidate));
            }
            candidate += 1u32;
        }

        tracing::warn!(
            order_bits = group.order().bits(),
            steps = params.max_relative_prime_steps,
            "relative prime search exhausted"
        );
        Err(CoreError::RelativePrimeSearchExhausted {
            steps: params.max_relative_prime_steps,
        })
    }
}

impl From<BigInt> for Exponent {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<BigUint> for Exponent {
    fn from(value: BigUint) -> Self {
        Self(BigInt::from_biguint(Sign::Plus, value))
    }
}

impl From<u32> for Exponent {
    fn from(value: u32) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<u64> for Exponent {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<i64> for Exponent {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

impl fmt::Debug for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exponent({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // 33 = 3 * 11, phi(33) = 20
    fn toy_group() -> GroupWithKnownOrder {
        GroupWithKnownOrder::new(BigUint::from(33u32), BigUint::from(20u32)).unwrap()
    }

    #[test]
    fn test_plain_arithmetic() {
        let a = Exponent::from(7u32);
        let b = Exponent::from(3u32);
        assert_eq!(a.add(&b), Exponent::from(10u32));
        assert_eq!(a.subtract(&b), Exponent::from(4u32));
        assert_eq!(a.multiply(&b), Exponent::from(21u32));
    }

    #[test]
    fn test_blinded_response_goes_negative() {
        // r - c * x with r = 5, c = 3, x = 4
        let response = Exponent::from(5u32).subtract(&Exponent::from(3u32).multiply(&Exponent::from(4u32)));
        assert_eq!(response, Exponent::from(-7i64));
        assert!(response.is_negative());
        assert_eq!(response.magnitude(), &BigUint::from(7u32));
        assert_eq!(response.reduce(&BigUint::from(20u32)), BigUint::from(13u32));
        assert_eq!(response.add(&Exponent::from(7u32)), Exponent::from(0u32));
    }

    #[test]
    fn test_negative_exponent_serde() {
        let e = Exponent::from(-300i64);
        let mut cbor = Vec::new();
        ciborium::into_writer(&e, &mut cbor).unwrap();
        let back: Exponent = ciborium::from_reader(cbor.as_slice()).unwrap();
        assert_eq!(back, e);

        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(serde_json::from_str::<Exponent>(&json).unwrap(), e);
    }

    #[test]
    fn test_inverse_modulo_order() {
        let group = toy_group();
        let e = Exponent::from(3u32);
        let d = e.inverse(&group);
        assert_eq!(d, Exponent::from(7u32));
        assert_eq!(e.multiply(&d).reduce(group.order()), BigUint::from(1u32));
    }

    #[test]
    fn test_inverse_of_negative_is_reduced() {
        let group = toy_group();
        // -3 = 17 mod 20, and 17 * 13 = 221 = 1 mod 20
        let d = Exponent::from(-3i64).inverse(&group);
        assert_eq!(d, Exponent::from(13u32));
        assert!(!d.is_negative());
    }

    #[test]
    #[should_panic(expected = "not relatively prime")]
    fn test_inverse_not_coprime_panics() {
        let _ = Exponent::from(4u32).inverse(&toy_group());
    }

    #[test]
    fn test_next_relative_prime() {
        let group = toy_group();
        let params = Parameters::default();

        // already coprime: returned unchanged
        assert_eq!(
            Exponent::from(3u32).get_next_relative_prime(&group, &params).unwrap(),
            Exponent::from(3u32)
        );
        // 4, 5, 6 share a factor with 20; 7 does not
        assert_eq!(
            Exponent::from(4u32).get_next_relative_prime(&group, &params).unwrap(),
            Exponent::from(7u32)
        );
        // 20, 21: 21 is coprime
        assert_eq!(
            Exponent::from(20u32).get_next_relative_prime(&group, &params).unwrap(),
            Exponent::from(21u32)
        );
        // -16 = 4 mod 20, so the search continues from 4
        assert_eq!(
            Exponent::from(-16i64).get_next_relative_prime(&group, &params).unwrap(),
            Exponent::from(7u32)
        );
    }

    #[test]
    fn test_next_relative_prime_bounded() {
        let group = toy_group();
        let params = Parameters {
            max_relative_prime_steps: 2,
            ..Parameters::default()
        };
        // 4 and 5 are the only candidates tried
        assert_eq!(
            Exponent::from(4u32).get_next_relative_prime(&group, &params),
            Err(CoreError::RelativePrimeSearchExhausted { steps: 2 })
        );
    }

    proptest! {
        #[test]
        fn prop_next_relative_prime_is_coprime(start in 0u64..1_000_000, order in 2u64..100_000) {
            let group = GroupWithKnownOrder::new(BigUint::from(order + 1), BigUint::from(order)).unwrap();
            let next = Exponent::from(start)
                .get_next_relative_prime(&group, &Parameters::default())
                .unwrap();
            prop_assert!(next.value() >= &BigInt::from(start));
            prop_assert!(next.is_relatively_prime(&group));
            let inverse = next.inverse(&group);
            prop_assert_eq!(next.multiply(&inverse).reduce(group.order()), BigUint::from(1u64));
        }

        #[test]
        fn prop_subtract_undoes_add(a in any::<i64>(), b in any::<i64>()) {
            let (a, b) = (Exponent::from(a), Exponent::from(b));
            prop_assert_eq!(a.add(&b).subtract(&b), a);
        }
    }
}
