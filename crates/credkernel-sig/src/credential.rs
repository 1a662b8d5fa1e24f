//! Credential signatures.
//!
//! A credential signature binds a payload to an [`ExposedExponent`]. The
//! issuer of the envelope signs the pair `(exposed hash, payload hash)`
//! with its host key, so a verifier only needs the envelope and the
//! issuer's public key at issuance.

use ciborium::value::Value;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use credkernel_core::{canonical, CoreError, Group, PrivateKey, Time};
use credkernel_perms::{ExposedExponent, PublicKeyRetriever};

use crate::config::SignatureConfig;
use crate::error::{Result, SigError};
use crate::kind::SignatureKind;
use crate::signature::Signature;

/// Domain for hashing credential bindings.
pub const CREDENTIAL_DOMAIN: &str = "credkernel-v0-credential";

/// A payload signed under a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSignature<T> {
    signature: Signature<T>,
    exposed: ExposedExponent,
    #[serde(with = "credkernel_core::encoding::biguint_bytes")]
    value: BigUint,
}

/// The hash a credential signature value is checked against.
pub fn credential_hash(exposed: &ExposedExponent, payload_hash: &BigUint) -> Result<BigUint> {
    let binding = Value::Map(vec![
        (canonical::key(0), canonical::biguint_value(&exposed.hash())),
        (canonical::key(1), canonical::biguint_value(payload_hash)),
    ]);
    let bytes = canonical::encode_canonical(&binding)?;
    Ok(canonical::hash_bytes(CREDENTIAL_DOMAIN, &bytes))
}

impl<T> CredentialSignature<T> {
    /// Reassemble a decoded credential signature.
    pub fn from_parts(signature: Signature<T>, exposed: ExposedExponent, value: BigUint) -> Self {
        Self {
            signature,
            exposed,
            value,
        }
    }

    /// Issue a credential signature over a precomputed payload hash.
    ///
    /// `key` must be the key the envelope's issuer host holds at
    /// issuance; nothing here can check that.
    pub fn issue_hash(
        signature: Signature<T>,
        exposed: ExposedExponent,
        key: &PrivateKey,
        payload_hash: &BigUint,
    ) -> Result<Self> {
        signature.required_time()?;
        let hash = credential_hash(&exposed, payload_hash)?;
        if &hash >= key.composite_group().modulus() {
            return Err(CoreError::InvalidKey("modulus is not larger than the hash".into()).into());
        }
        let value = key.sign(&hash);
        Ok(Self {
            signature,
            exposed,
            value,
        })
    }

    pub fn signature(&self) -> &Signature<T> {
        &self.signature
    }

    pub fn exposed(&self) -> &ExposedExponent {
        &self.exposed
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn kind(&self) -> SignatureKind {
        SignatureKind::Credential
    }

    /// The same signature with the envelope's permissions covered.
    pub fn with_covered_permissions(&self) -> Self
    where
        T: Clone,
    {
        Self {
            signature: self.signature.clone(),
            exposed: self.exposed.with_covered_permissions(),
            value: self.value.clone(),
        }
    }

    /// Verify against a precomputed payload hash.
    ///
    /// The signature must carry a time within `config.max_age` of `now`,
    /// and the credential must have been issued no more than
    /// `config.max_credential_age` before that time.
    pub fn verify_hash(
        &self,
        retriever: &dyn PublicKeyRetriever,
        payload_hash: &BigUint,
        now: Time,
        config: &SignatureConfig,
    ) -> Result<()> {
        self.signature.check_recency(now, config)?;
        let time = self.signature.required_time()?;

        let issuance = self.exposed.issuance();
        if issuance.is_older_than(config.max_credential_age, time) {
            tracing::warn!(issuer = %self.exposed.issuer(), %issuance, %time, "expired credential");
            return Err(SigError::ExpiredSignature { time: issuance });
        }

        let host = self.exposed.issuer().host();
        if !retriever.is_active(&host)? {
            tracing::warn!(issuer = %self.exposed.issuer(), "credential from inactive issuer");
            return Err(SigError::InactiveSignature { signer: host });
        }

        let public_key = self.exposed.public_key(retriever)?;
        let expected = credential_hash(&self.exposed, payload_hash)?;
        if public_key.apply(&self.value) != expected {
            tracing::warn!(issuer = %self.exposed.issuer(), %time, "credential signature mismatch");
            return Err(SigError::InvalidCredentialsSignature);
        }

        tracing::debug!(issuer = %self.exposed.issuer(), %time, "credential signature verified");
        Ok(())
    }
}

impl<T: Serialize> CredentialSignature<T> {
    /// Issue a credential signature over the canonical hash of `signature`.
    pub fn issue(signature: Signature<T>, exposed: ExposedExponent, key: &PrivateKey) -> Result<Self> {
        let payload_hash = signature.hash()?;
        Self::issue_hash(signature, exposed, key, &payload_hash)
    }

    /// Verify against the canonical hash of the signed payload.
    pub fn verify(
        &self,
        retriever: &dyn PublicKeyRetriever,
        now: Time,
        config: &SignatureConfig,
    ) -> Result<()> {
        let payload_hash = self.signature.hash()?;
        self.verify_hash(retriever, &payload_hash, now, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credkernel_core::{
        HostIdentifier, InternalNonHostIdentifier, Parameters, SemanticType,
        DEFAULT_PUBLIC_EXPONENT,
    };
    use credkernel_perms::{
        AgentPermissions, HashedOrSaltedAgentPermissions, KeyLookupError, StaticKeyRetriever,
    };

    fn mersenne(exp: usize) -> BigUint {
        (BigUint::from(1u32) << exp) - 1u32
    }

    fn issuer_key() -> PrivateKey {
        PrivateKey::from_primes(
            &mersenne(521),
            &mersenne(607),
            &BigUint::from(DEFAULT_PUBLIC_EXPONENT),
        )
        .unwrap()
    }

    fn host() -> HostIdentifier {
        HostIdentifier::new("example.com").unwrap()
    }

    fn issuance() -> Time {
        Time::from_millis(Time::HALF_HOUR.0 * 900_000)
    }

    fn exposed(expose: bool) -> ExposedExponent {
        let perms = AgentPermissions::none()
            .with(SemanticType::new("email@core.example.com").unwrap(), true);
        ExposedExponent::builder(
            InternalNonHostIdentifier::new("alice@example.com").unwrap(),
            issuance(),
            HashedOrSaltedAgentPermissions::with(perms, expose, &Parameters::default()),
        )
        .build()
        .unwrap()
    }

    fn retriever(key: &PrivateKey) -> StaticKeyRetriever {
        StaticKeyRetriever::new().with_key(host(), Time::ZERO, key.public_key())
    }

    fn now() -> Time {
        issuance().add(Time::HOUR)
    }

    fn issued(key: &PrivateKey) -> CredentialSignature<String> {
        let signature = Signature::about(host(), now(), "hello".to_string());
        CredentialSignature::issue(signature, exposed(true), key).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let key = issuer_key();
        let sig = issued(&key);
        assert_eq!(sig.kind(), SignatureKind::Credential);
        sig.verify(&retriever(&key), now(), &SignatureConfig::default())
            .unwrap();
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let key = issuer_key();
        let sig = issued(&key);
        let forged = CredentialSignature::from_parts(
            Signature::about(host(), now(), "goodbye".to_string()),
            sig.exposed().clone(),
            sig.value().clone(),
        );
        assert!(matches!(
            forged.verify(&retriever(&key), now(), &SignatureConfig::default()),
            Err(SigError::InvalidCredentialsSignature)
        ));
    }

    #[test]
    fn test_covering_keeps_signature_valid() {
        let key = issuer_key();
        let covered = issued(&key).with_covered_permissions();
        assert!(covered.exposed().permissions().are_covered());
        covered
            .verify(&retriever(&key), now(), &SignatureConfig::default())
            .unwrap();
    }

    #[test]
    fn test_stale_credential_rejected() {
        let key = issuer_key();
        let later = issuance().add(Time::DAY).add(Time::HOUR);
        let signature = Signature::about(host(), later, "hello".to_string());
        let sig = CredentialSignature::issue(signature, exposed(true), &key).unwrap();
        assert!(matches!(
            sig.verify(&retriever(&key), later, &SignatureConfig::default()),
            Err(SigError::ExpiredSignature { time }) if time == issuance()
        ));
    }

    #[test]
    fn test_inactive_issuer_rejected() {
        let key = issuer_key();
        let mut retriever = retriever(&key);
        retriever.deactivate(host());
        assert!(matches!(
            issued(&key).verify(&retriever, now(), &SignatureConfig::default()),
            Err(SigError::InactiveSignature { .. })
        ));
    }

    #[test]
    fn test_missing_key_is_permanent() {
        let err = issued(&issuer_key())
            .verify(&StaticKeyRetriever::new(), now(), &SignatureConfig::default())
            .unwrap_err();
        assert!(matches!(err, SigError::KeyLookup(KeyLookupError::NotFound { .. })));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_small_modulus_rejected() {
        let toy = PrivateKey::from_primes(&BigUint::from(3u32), &BigUint::from(11u32), &BigUint::from(3u32))
            .unwrap();
        let signature = Signature::about(host(), now(), "hello".to_string());
        assert!(matches!(
            CredentialSignature::issue(signature, exposed(true), &toy),
            Err(SigError::Core(CoreError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let key = issuer_key();
        let sig = issued(&key);
        let json = serde_json::to_string(&sig).unwrap();
        let recovered: CredentialSignature<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, sig);
        recovered
            .verify(&retriever(&key), now(), &SignatureConfig::default())
            .unwrap();
    }
}
