//! Host signatures.
//!
//! A host signs by raising the payload hash to its private exponent:
//! `value = hash^d mod n`. Anyone holding the public key `(n, e)` checks
//! `value^e mod n == hash`. Hashes are 256 bits, so host moduli must be
//! larger than that.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use credkernel_core::{CoreError, Group, HostIdentifier, PrivateKey, PublicKey, Time};
use credkernel_perms::PublicKeyRetriever;

use crate::config::SignatureConfig;
use crate::error::{Result, SigError};
use crate::kind::SignatureKind;
use crate::signature::Signature;

/// A payload signed by a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSignature<T> {
    signature: Signature<T>,
    signer: HostIdentifier,
    #[serde(with = "credkernel_core::encoding::biguint_bytes")]
    value: BigUint,
}

impl<T> HostSignature<T> {
    /// Reassemble a decoded host signature.
    pub fn from_parts(signature: Signature<T>, signer: HostIdentifier, value: BigUint) -> Self {
        Self {
            signature,
            signer,
            value,
        }
    }

    /// Sign a precomputed `hash` of `signature`.
    pub fn sign_hash(
        signature: Signature<T>,
        signer: HostIdentifier,
        key: &PrivateKey,
        hash: &BigUint,
    ) -> Result<Self> {
        if hash >= key.composite_group().modulus() {
            return Err(CoreError::InvalidKey("modulus is not larger than the hash".into()).into());
        }
        signature.required_time()?;
        let value = key.sign(hash);
        Ok(Self {
            signature,
            signer,
            value,
        })
    }

    /// Check `value^e mod n == hash`.
    pub fn verify_signature(public_key: &PublicKey, value: &BigUint, hash: &BigUint) -> Result<()> {
        if &public_key.apply(value) != hash {
            return Err(SigError::InvalidHostSignature);
        }
        Ok(())
    }

    pub fn signature(&self) -> &Signature<T> {
        &self.signature
    }

    pub fn signer(&self) -> &HostIdentifier {
        &self.signer
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn kind(&self) -> SignatureKind {
        SignatureKind::Host
    }

    /// Verify against a precomputed `hash` of the signed payload.
    ///
    /// Checks, in order: the signature carries a time, it is not older
    /// than `config.max_age`, the signer is active, and the value matches
    /// the signer's key at the signature's time.
    pub fn verify_hash(
        &self,
        retriever: &dyn PublicKeyRetriever,
        hash: &BigUint,
        now: Time,
        config: &SignatureConfig,
    ) -> Result<()> {
        let time = self.signature.required_time()?;

        if time.is_older_than(config.max_age, now) {
            tracing::warn!(signer = %self.signer, %time, "expired host signature");
            return Err(SigError::ExpiredHostSignature {
                signer: self.signer.clone(),
                time,
            });
        }

        if !retriever.is_active(&self.signer)? {
            tracing::warn!(signer = %self.signer, "host signature from inactive signer");
            return Err(SigError::InactiveSignature {
                signer: self.signer.clone(),
            });
        }

        let public_key = retriever.retrieve(&self.signer, time)?;
        Self::verify_signature(&public_key, &self.value, hash).map_err(|e| {
            tracing::warn!(signer = %self.signer, %time, key = %public_key.fingerprint(), "host signature mismatch");
            e
        })?;

        tracing::debug!(signer = %self.signer, %time, key = %public_key.fingerprint(), "host signature verified");
        Ok(())
    }
}

impl<T: Serialize> HostSignature<T> {
    /// Sign `signature` with its canonical hash.
    pub fn sign(signature: Signature<T>, signer: HostIdentifier, key: &PrivateKey) -> Result<Self> {
        let hash = signature.hash()?;
        Self::sign_hash(signature, signer, key, &hash)
    }

    /// Verify against the canonical hash of the signed payload.
    pub fn verify(
        &self,
        retriever: &dyn PublicKeyRetriever,
        now: Time,
        config: &SignatureConfig,
    ) -> Result<()> {
        let hash = self.signature.hash()?;
        self.verify_hash(retriever, &hash, now, config)
    }
}
