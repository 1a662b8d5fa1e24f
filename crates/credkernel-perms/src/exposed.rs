//! The exposed exponent: the public envelope of a credential.
//!
//! It binds an issuer, a half-hour issuance slot, a commitment to the
//! granted permissions, and optionally a role or attribute content. The
//! issuer's public key is not stored; it is looked up for the issuance
//! slot through whichever retriever the caller supplies.

use std::fmt;

use ciborium::value::Value;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use credkernel_core::canonical::{self, Canonical};
use credkernel_core::{InternalNonHostIdentifier, PublicKey, SemanticType, Time};

use crate::error::{KeyLookupError, PermsError, Result};
use crate::retriever::PublicKeyRetriever;
use crate::salted::HashedOrSaltedAgentPermissions;

/// Domain for hashing exposed exponents.
pub const EXPOSED_DOMAIN: &str = "credkernel-v0-exposed";

mod keys {
    pub const ISSUER: u64 = 0;
    pub const ISSUANCE: u64 = 1;
    pub const PERMISSIONS_HASH: u64 = 2;
    pub const ROLE: u64 = 3;
    pub const ATTRIBUTE_CONTENT: u64 = 4;
}

/// The public part of a credential.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "ExposedRepr", into = "ExposedRepr")]
pub struct ExposedExponent {
    issuer: InternalNonHostIdentifier,
    issuance: Time,
    permissions: HashedOrSaltedAgentPermissions,
    role: Option<SemanticType>,
    attribute_content: Option<Vec<u8>>,
}

impl ExposedExponent {
    /// Start building an exposed exponent.
    pub fn builder(
        issuer: InternalNonHostIdentifier,
        issuance: Time,
        permissions: HashedOrSaltedAgentPermissions,
    ) -> ExposedExponentBuilder {
        ExposedExponentBuilder {
            issuer,
            issuance,
            permissions,
            role: None,
            attribute_content: None,
        }
    }

    pub fn issuer(&self) -> &InternalNonHostIdentifier {
        &self.issuer
    }

    /// Issuance time, a positive multiple of half an hour.
    pub fn issuance(&self) -> Time {
        self.issuance
    }

    pub fn permissions(&self) -> &HashedOrSaltedAgentPermissions {
        &self.permissions
    }

    pub fn role(&self) -> Option<&SemanticType> {
        self.role.as_ref()
    }

    pub fn attribute_content(&self) -> Option<&[u8]> {
        self.attribute_content.as_deref()
    }

    /// Whether the credential only authenticates the issuer's identity,
    /// with neither a role nor attribute content.
    pub fn is_identity_based(&self) -> bool {
        self.role.is_none() && self.attribute_content.is_none()
    }

    /// The issuer's public key for the issuance slot.
    ///
    /// Every call asks `retriever`; wrap it in a
    /// [`CachingRetriever`](crate::retriever::CachingRetriever) to avoid
    /// repeated lookups. Lookup failures are returned as they are, so
    /// callers can tell a missing key from a lookup that may succeed later.
    pub fn public_key(
        &self,
        retriever: &dyn PublicKeyRetriever,
    ) -> std::result::Result<PublicKey, KeyLookupError> {
        let host = self.issuer.host();
        retriever.retrieve(&host, self.issuance).map_err(|e| {
            tracing::warn!(issuer = %self.issuer, issuance = %self.issuance, error = %e, "issuer key lookup failed");
            e
        })
    }

    /// The same envelope with the permissions covered.
    ///
    /// The commitment is unchanged, so signatures over the original still
    /// verify.
    pub fn with_covered_permissions(&self) -> Self {
        let mut covered = self.clone();
        covered.permissions = self.permissions.cover();
        covered
    }

    /// Hash of the canonical encoding.
    pub fn hash(&self) -> BigUint {
        let bytes = self
            .canonical_bytes()
            .expect("exposed exponent encoding contains no floats");
        canonical::hash_bytes(EXPOSED_DOMAIN, &bytes)
    }
}

impl Canonical for ExposedExponent {
    /// Only the permission commitment is encoded, never the permissions.
    fn to_cbor_value(&self) -> Value {
        Value::Map(vec![
            (
                canonical::key(keys::ISSUER),
                Value::Text(self.issuer.to_string()),
            ),
            (
                canonical::key(keys::ISSUANCE),
                Value::Integer(self.issuance.as_millis().into()),
            ),
            (
                canonical::key(keys::PERMISSIONS_HASH),
                canonical::biguint_value(&self.permissions.get_hash()),
            ),
            (
                canonical::key(keys::ROLE),
                canonical::optional(self.role.as_ref(), |r| Value::Text(r.to_string())),
            ),
            (
                canonical::key(keys::ATTRIBUTE_CONTENT),
                canonical::optional(self.attribute_content.as_ref(), |c| Value::Bytes(c.clone())),
            ),
        ])
    }
}

impl PartialEq for ExposedExponent {
    fn eq(&self, other: &Self) -> bool {
        self.issuer == other.issuer
            && self.issuance == other.issuance
            && self.permissions == other.permissions
            && self.role == other.role
            && self.attribute_content == other.attribute_content
    }
}

impl Eq for ExposedExponent {}

impl fmt::Debug for ExposedExponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExposedExponent")
            .field("issuer", &self.issuer)
            .field("issuance", &self.issuance)
            .field("exposed", &self.permissions.are_exposed())
            .field("role", &self.role)
            .field(
                "attribute_content",
                &self.attribute_content.as_ref().map(Vec::len),
            )
            .finish()
    }
}

/// Builder for [`ExposedExponent`]. Validates on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ExposedExponentBuilder {
    issuer: InternalNonHostIdentifier,
    issuance: Time,
    permissions: HashedOrSaltedAgentPermissions,
    role: Option<SemanticType>,
    attribute_content: Option<Vec<u8>>,
}

impl ExposedExponentBuilder {
    /// Scope the credential to a role.
    pub fn role(mut self, role: SemanticType) -> Self {
        self.role = Some(role);
        self
    }

    /// Attach attribute content.
    pub fn attribute_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.attribute_content = Some(content.into());
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<ExposedExponent> {
        if !self.issuance.is_positive() || !self.issuance.is_multiple_of(Time::HALF_HOUR) {
            return Err(PermsError::InvalidIssuance(self.issuance));
        }
        self.permissions.check()?;

        Ok(ExposedExponent {
            issuer: self.issuer,
            issuance: self.issuance,
            permissions: self.permissions,
            role: self.role,
            attribute_content: self.attribute_content,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct ExposedRepr {
    issuer: InternalNonHostIdentifier,
    issuance: Time,
    permissions: HashedOrSaltedAgentPermissions,
    role: Option<SemanticType>,
    attribute_content: Option<Vec<u8>>,
}

impl TryFrom<ExposedRepr> for ExposedExponent {
    type Error = PermsError;

    fn try_from(repr: ExposedRepr) -> Result<Self> {
        let mut builder = ExposedExponent::builder(repr.issuer, repr.issuance, repr.permissions);
        builder.role = repr.role;
        builder.attribute_content = repr.attribute_content;
        builder.build()
    }
}

impl From<ExposedExponent> for ExposedRepr {
    fn from(value: ExposedExponent) -> Self {
        Self {
            issuer: value.issuer,
            issuance: value.issuance,
            permissions: value.permissions,
            role: value.role,
            attribute_content: value.attribute_content,
        }
    }
}
