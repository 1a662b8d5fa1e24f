//! Cryptographic parameters shared by the whole engine.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Smallest salt/hash length accepted outside of tests.
pub const MIN_HASH_BITS: u64 = 256;

/// Cryptographic parameters.
///
/// Passed explicitly to the operations that need them instead of being
/// read from a process-wide global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Bit length of permission salts. Hashes are always 256 bits.
    pub hash_bits: u64,
    /// Upper bound on draws in [`Group::get_random_element`](crate::Group::get_random_element).
    pub max_sampling_attempts: u32,
    /// Upper bound on candidates in
    /// [`Exponent::get_next_relative_prime`](crate::Exponent::get_next_relative_prime).
    pub max_relative_prime_steps: u64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            hash_bits: MIN_HASH_BITS,
            max_sampling_attempts: 1_000,
            max_relative_prime_steps: 1_000_000,
        }
    }
}

impl Parameters {
    /// Small parameters for tests with toy moduli.
    ///
    /// Never use these to issue real credentials.
    pub fn for_testing() -> Self {
        Self {
            hash_bits: 64,
            ..Self::default()
        }
    }

    /// Check that the parameters are adequate for issuing credentials.
    pub fn validate(&self) -> Result<()> {
        if self.hash_bits < MIN_HASH_BITS {
            return Err(CoreError::InvalidParameters(format!(
                "hash_bits must be at least {MIN_HASH_BITS}, got {}",
                self.hash_bits
            )));
        }
        if self.max_sampling_attempts == 0 {
            return Err(CoreError::InvalidParameters(
                "max_sampling_attempts must be positive".into(),
            ));
        }
        if self.max_relative_prime_steps == 0 {
            return Err(CoreError::InvalidParameters(
                "max_relative_prime_steps must be positive".into(),
            ));
        }
        Ok(())
    }
}
