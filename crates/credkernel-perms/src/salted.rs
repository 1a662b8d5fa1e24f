//! Commit/reveal for permission sets.
//!
//! Permission vocabularies are small, so a bare hash of a permission set
//! could be reversed by enumeration. Every commitment is therefore taken
//! over the permissions together with a fresh random salt.
//!
//! A credential carries either the salted permissions themselves (exposed)
//! or only the hash of them (covered). The hash is computable in both
//! cases, so a verifier always sees the same commitment.

use ciborium::value::Value;
use num_bigint::{BigUint, RandBigInt};
use serde::{Deserialize, Serialize};

use credkernel_core::canonical::{self, Canonical};
use credkernel_core::Parameters;

use crate::error::{PermsError, Result};
use crate::permissions::AgentPermissions;

/// Domain for hashing salted permissions.
pub const PERMISSIONS_DOMAIN: &str = "credkernel-v0-permissions";

mod keys {
    pub const SALT: u64 = 0;
    pub const PERMISSIONS: u64 = 1;
}

/// A permission set paired with a random salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltedAgentPermissions {
    #[serde(with = "credkernel_core::encoding::biguint_bytes")]
    salt: BigUint,
    permissions: AgentPermissions,
}

impl SaltedAgentPermissions {
    /// Salt `permissions` with `params.hash_bits` fresh random bits.
    ///
    /// Every call draws a new salt, so the same permissions give a
    /// different instance and hash each time.
    pub fn with(permissions: AgentPermissions, params: &Parameters) -> Self {
        let salt = rand::thread_rng().gen_biguint(params.hash_bits);
        Self { salt, permissions }
    }

    /// Reassemble decoded salted permissions.
    pub fn from_parts(salt: BigUint, permissions: AgentPermissions) -> Self {
        Self { salt, permissions }
    }

    pub fn salt(&self) -> &BigUint {
        &self.salt
    }

    pub fn permissions(&self) -> &AgentPermissions {
        &self.permissions
    }

    /// The commitment to these salted permissions.
    pub fn hash(&self) -> BigUint {
        let bytes = self
            .canonical_bytes()
            .expect("permission encoding contains no floats");
        canonical::hash_bytes(PERMISSIONS_DOMAIN, &bytes)
    }
}

impl Canonical for SaltedAgentPermissions {
    fn to_cbor_value(&self) -> Value {
        Value::Map(vec![
            (canonical::key(keys::SALT), canonical::biguint_value(&self.salt)),
            (canonical::key(keys::PERMISSIONS), self.permissions.to_cbor_value()),
        ])
    }
}

/// Either the salted permissions (exposed) or only their hash (covered).
///
/// Exactly one of the two is present. Values built with
/// [`with`](Self::with) or deserialized always satisfy this;
/// [`from_parts`](Self::from_parts) does not check, and
/// [`validate`](Self::validate) guards that path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HashedOrSaltedRepr", into = "HashedOrSaltedRepr")]
pub struct HashedOrSaltedAgentPermissions {
    salted_permissions: Option<SaltedAgentPermissions>,
    stored_hash: Option<BigUint>,
}

impl HashedOrSaltedAgentPermissions {
    /// Salt `permissions` and either keep them (`exposed`) or keep only
    /// their hash.
    pub fn with(permissions: AgentPermissions, exposed: bool, params: &Parameters) -> Self {
        let salted = SaltedAgentPermissions::with(permissions, params);
        if exposed {
            Self {
                salted_permissions: Some(salted),
                stored_hash: None,
            }
        } else {
            Self {
                salted_permissions: None,
                stored_hash: Some(salted.hash()),
            }
        }
    }

    /// Reassemble from decoded fields without checking them.
    pub fn from_parts(
        salted_permissions: Option<SaltedAgentPermissions>,
        stored_hash: Option<BigUint>,
    ) -> Self {
        Self {
            salted_permissions,
            stored_hash,
        }
    }

    /// The commitment, stored or derived from the salted permissions.
    pub fn get_hash(&self) -> BigUint {
        match (&self.stored_hash, &self.salted_permissions) {
            (Some(hash), _) => hash.clone(),
            (None, Some(salted)) => salted.hash(),
            (None, None) => {
                panic!("hashed or salted permissions hold neither permissions nor hash")
            }
        }
    }

    pub fn are_exposed(&self) -> bool {
        self.salted_permissions.is_some()
    }

    pub fn are_covered(&self) -> bool {
        self.salted_permissions.is_none()
    }

    pub fn get_salted_permissions(&self) -> Option<&SaltedAgentPermissions> {
        self.salted_permissions.as_ref()
    }

    /// The exposed permissions.
    ///
    /// # Panics
    ///
    /// If the permissions are covered. Check [`are_exposed`](Self::are_exposed) first.
    pub fn get_exposed_permissions(&self) -> &AgentPermissions {
        match &self.salted_permissions {
            Some(salted) => salted.permissions(),
            None => panic!("permissions are covered and cannot be read"),
        }
    }

    /// A covered copy committing to the same hash.
    pub fn cover(&self) -> Self {
        Self {
            salted_permissions: None,
            stored_hash: Some(self.get_hash()),
        }
    }

    /// Check the exactly-one invariant.
    pub fn check(&self) -> Result<()> {
        if self.salted_permissions.is_some() == self.stored_hash.is_some() {
            return Err(PermsError::InvalidCommitment);
        }
        Ok(())
    }

    /// Assert the exactly-one invariant.
    ///
    /// # Panics
    ///
    /// If both or neither of salted permissions and stored hash are present.
    pub fn validate(&self) {
        if let Err(e) = self.check() {
            panic!("{e}");
        }
    }
}

#[derive(Serialize, Deserialize)]
struct HashedOrSaltedRepr {
    salted_permissions: Option<SaltedAgentPermissions>,
    #[serde(with = "credkernel_core::encoding::option_biguint_bytes")]
    stored_hash: Option<BigUint>,
}

impl TryFrom<HashedOrSaltedRepr> for HashedOrSaltedAgentPermissions {
    type Error = PermsError;

    fn try_from(repr: HashedOrSaltedRepr) -> Result<Self> {
        let value = Self::from_parts(repr.salted_permissions, repr.stored_hash);
        value.check()?;
        Ok(value)
    }
}

impl From<HashedOrSaltedAgentPermissions> for HashedOrSaltedRepr {
    fn from(value: HashedOrSaltedAgentPermissions) -> Self {
        Self {
            salted_permissions: value.salted_permissions,
            stored_hash: value.stored_hash,
        }
    }
}
