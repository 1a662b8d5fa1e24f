//! Multiplicative groups of integers modulo a positive modulus.
//!
//! Two handle types share the [`Group`] trait:
//!
//! - [`GroupWithKnownOrder`] also carries the group order and is the only
//!   handle accepted by operations that need it (exponent inversion,
//!   coprimality search).
//! - [`GroupWithUnknownOrder`] carries only the modulus.
//!
//! [`GroupWithKnownOrder::drop_order`] converts the first into the second.
//! There is no conversion back. Equality and hashing use the modulus alone,
//! so both handles to the same group compare equal.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::config::Parameters;
use crate::element::Element;
use crate::error::{CoreError, Result};
use crate::exponent::Exponent;

/// Extra bits drawn for random exponents, as a statistical margin.
pub const EXPONENT_MARGIN_BITS: u64 = 4;

/// Operations common to every group handle.
pub trait Group {
    /// The shared modulus.
    fn shared_modulus(&self) -> &Arc<BigUint>;

    /// The modulus of this group.
    fn modulus(&self) -> &BigUint {
        self.shared_modulus()
    }

    /// Get the element `value mod modulus`. Never fails.
    fn get_element(&self, value: &BigUint) -> Element {
        Element::new(Arc::clone(self.shared_modulus()), value)
    }

    /// Draw a uniformly random element coprime to the modulus.
    ///
    /// Uses rejection sampling with the thread-local CSPRNG. Exceeding
    /// `params.max_sampling_attempts` draws means the modulus is malformed
    /// and yields [`CoreError::SamplingExhausted`].
    fn get_random_element(&self, params: &Parameters) -> Result<Element> {
        let modulus = self.modulus();
        let bits = modulus.bits();
        let mut rng = rand::thread_rng();

        for _ in 0..params.max_sampling_attempts {
            let candidate = rng.gen_biguint(bits);
            if &candidate < modulus && candidate.gcd(modulus).is_one() {
                return Ok(Element::from_reduced(
                    Arc::clone(self.shared_modulus()),
                    candidate,
                ));
            }
        }

        tracing::warn!(
            modulus_bits = bits,
            attempts = params.max_sampling_attempts,
            "random element sampling exhausted"
        );
        Err(CoreError::SamplingExhausted {
            attempts: params.max_sampling_attempts,
        })
    }

    /// Draw a random exponent of `modulus.bits() + 4` bits.
    fn get_random_exponent(&self) -> Exponent {
        self.get_random_exponent_with_bits(self.modulus().bits() + EXPONENT_MARGIN_BITS)
    }

    /// Draw a uniformly random integer of exactly `bits` bits.
    ///
    /// The result is not reduced by anything; it is meant for blinding.
    fn get_random_exponent_with_bits(&self, bits: u64) -> Exponent {
        Exponent::from(random_with_exact_bits(bits))
    }
}

/// A uniformly random integer whose highest set bit is bit `bits - 1`.
pub(crate) fn random_with_exact_bits(bits: u64) -> BigUint {
    if bits == 0 {
        return BigUint::zero();
    }
    let mut rng = rand::thread_rng();
    let low = rng.gen_biguint(bits - 1);
    low | (BigUint::one() << (bits - 1))
}

fn check_positive(name: &str, value: &BigUint) -> Result<()> {
    if value.is_zero() {
        return Err(CoreError::InvalidGroup(format!("{name} must be positive")));
    }
    Ok(())
}

/// A group whose order is known to the holder of this handle.
#[derive(Clone)]
pub struct GroupWithKnownOrder {
    modulus: Arc<BigUint>,
    order: Arc<BigUint>,
}

impl GroupWithKnownOrder {
    /// Create a group from a modulus and its order.
    pub fn new(modulus: BigUint, order: BigUint) -> Result<Self> {
        check_positive("modulus", &modulus)?;
        check_positive("order", &order)?;
        Ok(Self {
            modulus: Arc::new(modulus),
            order: Arc::new(order),
        })
    }

    /// The order of the group.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Forget the order.
    ///
    /// The returned handle can be given to components that must not be
    /// able to invert exponents.
    ///
    /// ```
    /// use credkernel_core::{BigUint, Exponent, GroupWithKnownOrder};
    ///
    /// let group = GroupWithKnownOrder::new(BigUint::from(33u32), BigUint::from(20u32)).unwrap();
    /// assert_eq!(Exponent::from(3u32).inverse(&group), Exponent::from(7u32));
    /// ```
    ///
    /// Once dropped, order-dependent operations no longer type-check:
    ///
    /// ```compile_fail
    /// use credkernel_core::{BigUint, Exponent, GroupWithKnownOrder};
    ///
    /// let group = GroupWithKnownOrder::new(BigUint::from(33u32), BigUint::from(20u32)).unwrap();
    /// let public = group.drop_order();
    /// let _ = Exponent::from(3u32).inverse(&public);
    /// ```
    ///
    /// ```compile_fail
    /// use credkernel_core::{BigUint, Exponent, GroupWithKnownOrder, Parameters};
    ///
    /// let group = GroupWithKnownOrder::new(BigUint::from(33u32), BigUint::from(20u32)).unwrap();
    /// let public = group.drop_order();
    /// let _ = Exponent::from(4u32).get_next_relative_prime(&public, &Parameters::default());
    /// ```
    pub fn drop_order(&self) -> GroupWithUnknownOrder {
        GroupWithUnknownOrder {
            modulus: Arc::clone(&self.modulus),
        }
    }
}

impl Group for GroupWithKnownOrder {
    fn shared_modulus(&self) -> &Arc<BigUint> {
        &self.modulus
    }
}

/// A group for which only the modulus is known.
#[derive(Clone)]
pub struct GroupWithUnknownOrder {
    modulus: Arc<BigUint>,
}

impl GroupWithUnknownOrder {
    /// Create a group from its modulus.
    pub fn new(modulus: BigUint) -> Result<Self> {
        check_positive("modulus", &modulus)?;
        Ok(Self {
            modulus: Arc::new(modulus),
        })
    }

    pub(crate) fn from_shared(modulus: Arc<BigUint>) -> Self {
        Self { modulus }
    }
}

impl Group for GroupWithUnknownOrder {
    fn shared_modulus(&self) -> &Arc<BigUint> {
        &self.modulus
    }
}

impl PartialEq for GroupWithKnownOrder {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }
}

impl Eq for GroupWithKnownOrder {}

impl PartialEq for GroupWithUnknownOrder {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }
}

impl Eq for GroupWithUnknownOrder {}

impl PartialEq<GroupWithUnknownOrder> for GroupWithKnownOrder {
    fn eq(&self, other: &GroupWithUnknownOrder) -> bool {
        self.modulus == other.modulus
    }
}

impl PartialEq<GroupWithKnownOrder> for GroupWithUnknownOrder {
    fn eq(&self, other: &GroupWithKnownOrder) -> bool {
        self.modulus == other.modulus
    }
}

impl Hash for GroupWithKnownOrder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.modulus.hash(state);
    }
}

impl Hash for GroupWithUnknownOrder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.modulus.hash(state);
    }
}

// The order stays out of Debug output.
impl fmt::Debug for GroupWithKnownOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupWithKnownOrder({} bits)", self.modulus.bits())
    }
}

impl fmt::Debug for GroupWithUnknownOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupWithUnknownOrder({} bits)", self.modulus.bits())
    }
}
