//! Elements of a multiplicative group.

use std::fmt;
use std::sync::Arc;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use crate::exponent::Exponent;
use crate::group::GroupWithUnknownOrder;

/// A value in `[0, modulus)` tied to the group it belongs to.
///
/// The modulus is shared with the group, not owned. Binary operations
/// check that both operands belong to the same group and panic otherwise:
/// mixing groups is a defect in the caller.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Element {
    modulus: Arc<BigUint>,
    value: BigUint,
}

impl Element {
    /// Create an element, reducing `value` modulo the modulus.
    pub(crate) fn new(modulus: Arc<BigUint>, value: &BigUint) -> Self {
        let value = value % modulus.as_ref();
        Self { modulus, value }
    }

    /// Create an element from a value already known to be reduced.
    pub(crate) fn from_reduced(modulus: Arc<BigUint>, value: BigUint) -> Self {
        debug_assert!(value < *modulus);
        Self { modulus, value }
    }

    /// The group this element belongs to.
    pub fn group(&self) -> GroupWithUnknownOrder {
        GroupWithUnknownOrder::from_shared(Arc::clone(&self.modulus))
    }

    /// The value of this element, always smaller than the modulus.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Consume the element and return its value.
    pub fn into_value(self) -> BigUint {
        self.value
    }

    /// Whether the value is coprime to the modulus (and thus invertible).
    pub fn is_relatively_prime(&self) -> bool {
        self.value.gcd(&self.modulus).is_one()
    }

    /// Whether the value is one.
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Whether `other` belongs to the same group as this element.
    pub fn same_group(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.modulus, &other.modulus) || self.modulus == other.modulus
    }

    fn assert_same_group(&self, other: &Element, op: &str) {
        assert!(
            self.same_group(other),
            "cannot {op} elements of different groups ({} bits vs {} bits)",
            self.modulus.bits(),
            other.modulus.bits()
        );
    }

    fn with_value(&self, value: BigUint) -> Self {
        Self::new(Arc::clone(&self.modulus), &value)
    }

    /// `(self + other) mod modulus`.
    ///
    /// # Panics
    ///
    /// If `other` belongs to a different group.
    pub fn add(&self, other: &Element) -> Element {
        self.assert_same_group(other, "add");
        self.with_value(&self.value + &other.value)
    }

    /// `(self - other) mod modulus`.
    ///
    /// # Panics
    ///
    /// If `other` belongs to a different group.
    pub fn subtract(&self, other: &Element) -> Element {
        self.assert_same_group(other, "subtract");
        // Both values are reduced, so adding the modulus keeps this non-negative.
        self.with_value(&self.value + self.modulus.as_ref() - &other.value)
    }

    /// `(self * other) mod modulus`.
    ///
    /// # Panics
    ///
    /// If `other` belongs to a different group.
    pub fn multiply(&self, other: &Element) -> Element {
        self.assert_same_group(other, "multiply");
        self.with_value(&self.value * &other.value)
    }

    /// The multiplicative inverse, or `None` if this element has none.
    pub fn try_inverse(&self) -> Option<Element> {
        self.value
            .modinv(&self.modulus)
            .map(|inverse| Self::from_reduced(Arc::clone(&self.modulus), inverse))
    }

    /// The multiplicative inverse.
    ///
    /// # Panics
    ///
    /// If the element is not relatively prime to the modulus. Callers must
    /// check [`is_relatively_prime`](Self::is_relatively_prime) first.
    pub fn inverse(&self) -> Element {
        match self.try_inverse() {
            Some(inverse) => inverse,
            None => panic!("element is not relatively prime to the modulus and has no inverse"),
        }
    }

    /// `self ^ exponent mod modulus`.
    pub fn pow(&self, exponent: &BigUint) -> Element {
        Self::from_reduced(
            Arc::clone(&self.modulus),
            self.value.modpow(exponent, &self.modulus),
        )
    }

    /// `self ^ exponent mod modulus` for an [`Exponent`].
    ///
    /// A negative exponent raises the inverse to the magnitude.
    ///
    /// # Panics
    ///
    /// If the exponent is negative and this element has no inverse.
    pub fn pow_exponent(&self, exponent: &Exponent) -> Element {
        if exponent.is_negative() {
            self.inverse().pow(exponent.magnitude())
        } else {
            self.pow(exponent.magnitude())
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Element({} mod {}-bit group)",
            self.value,
            self.modulus.bits()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Group, GroupWithKnownOrder};
    use proptest::prelude::*;

    fn group(modulus: u64) -> GroupWithUnknownOrder {
        GroupWithUnknownOrder::new(BigUint::from(modulus)).unwrap()
    }

    fn el(g: &GroupWithUnknownOrder, v: u64) -> Element {
        g.get_element(&BigUint::from(v))
    }

    #[test]
    fn test_arithmetic_wraps() {
        let g = group(33);
        assert_eq!(el(&g, 30).add(&el(&g, 5)).value(), &BigUint::from(2u32));
        assert_eq!(el(&g, 3).subtract(&el(&g, 5)).value(), &BigUint::from(31u32));
        assert_eq!(el(&g, 10).multiply(&el(&g, 10)).value(), &BigUint::from(1u32));
    }

    #[test]
    fn test_pow() {
        let g = group(33);
        assert_eq!(el(&g, 4).pow(&BigUint::from(7u32)).value(), &BigUint::from(16u32));
        assert_eq!(el(&g, 16).pow(&BigUint::from(3u32)).value(), &BigUint::from(4u32));
        assert_eq!(
            el(&g, 16).pow_exponent(&Exponent::from(3u32)).value(),
            &BigUint::from(4u32)
        );
        assert!(el(&g, 5).pow(&BigUint::from(0u32)).is_one());
    }

    #[test]
    fn test_negative_exponent_round_trips() {
        let g = group(33);
        let base = el(&g, 4);
        let r = Exponent::from(5u32);
        let response = r.subtract(&Exponent::from(3u32).multiply(&Exponent::from(4u32)));
        assert!(response.is_negative());

        // 4^-7 = (4^-1)^7 = 25^7 = 31 mod 33, and 31 * 4^7 = 31 * 16 = 1
        let raised = base.pow_exponent(&response);
        assert_eq!(raised.value(), &BigUint::from(31u32));
        assert!(raised.multiply(&base.pow_exponent(&Exponent::from(7u32))).is_one());

        // g^(r - 12) * g^12 = g^r
        let restored = raised.multiply(&base.pow_exponent(&Exponent::from(12u32)));
        assert_eq!(restored, base.pow_exponent(&r));
    }

    #[test]
    #[should_panic(expected = "no inverse")]
    fn test_negative_exponent_of_non_coprime_panics() {
        let g = group(33);
        let _ = el(&g, 11).pow_exponent(&Exponent::from(-1i64));
    }

    #[test]
    fn test_inverse() {
        let g = group(33);
        let e = el(&g, 4);
        assert!(e.is_relatively_prime());
        assert!(e.multiply(&e.inverse()).is_one());
    }

    #[test]
    #[should_panic(expected = "no inverse")]
    fn test_inverse_of_non_coprime_panics() {
        let g = group(33);
        let e = el(&g, 6);
        assert!(!e.is_relatively_prime());
        let _ = e.inverse();
    }

    #[test]
    fn test_try_inverse_of_non_coprime_is_none() {
        let g = group(33);
        assert!(el(&g, 11).try_inverse().is_none());
        assert!(el(&g, 0).try_inverse().is_none());
    }

    #[test]
    #[should_panic(expected = "different groups")]
    fn test_cross_group_multiply_panics() {
        let a = el(&group(33), 2);
        let b = el(&group(35), 2);
        let _ = a.multiply(&b);
    }

    #[test]
    fn test_same_group_across_handles() {
        let known = GroupWithKnownOrder::new(BigUint::from(33u32), BigUint::from(20u32)).unwrap();
        let unknown = group(33);
        let a = known.get_element(&BigUint::from(2u32));
        let b = unknown.get_element(&BigUint::from(5u32));
        assert!(a.same_group(&b));
        assert_eq!(a.multiply(&b).value(), &BigUint::from(10u32));
        assert!(a.group() == known);
    }

    proptest! {
        #[test]
        fn prop_get_element_is_reduced(m in 2u64..=u64::MAX, x in any::<u128>()) {
            let g = group(m);
            let e = g.get_element(&BigUint::from(x));
            prop_assert!(e.value() < g.modulus());
            prop_assert_eq!(e.value(), &(BigUint::from(x) % BigUint::from(m)));
        }

        #[test]
        fn prop_inverse_multiplies_to_one(m in 2u64..1_000_000, x in any::<u64>()) {
            let g = group(m);
            let e = g.get_element(&BigUint::from(x));
            if e.is_relatively_prime() {
                prop_assert!(e.multiply(&e.inverse()).is_one());
            } else {
                prop_assert!(e.try_inverse().is_none());
            }
        }

        #[test]
        fn prop_subtract_undoes_add(m in 2u64..=u64::MAX, a in any::<u64>(), b in any::<u64>()) {
            let g = group(m);
            let (a, b) = (el(&g, a), el(&g, b));
            prop_assert_eq!(a.add(&b).subtract(&b), a);
        }
    }
}
