//! The verifier: one entry point for every signature kind.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use credkernel_core::{BigUint, Parameters, PublicKey, Time};
use credkernel_perms::{
    AgentPermissions, ExposedExponent, HashedOrSaltedAgentPermissions, NoRetriever,
    PublicKeyRetriever,
};
use credkernel_sig::{SigError, SignatureKind, Signed};

use crate::config::VerifierConfig;
use crate::error::Result;

/// Verifies signed payloads against keys from an injected retriever.
///
/// Cheap to share across threads; every verification is independent and
/// a rejected message does not affect any other.
#[derive(Clone)]
pub struct Verifier {
    retriever: Arc<dyn PublicKeyRetriever>,
    config: VerifierConfig,
}

impl Verifier {
    /// Create a verifier without a retriever.
    ///
    /// Signed payloads fail with [`KeyLookupError::NoRetriever`](credkernel_perms::KeyLookupError::NoRetriever)
    /// until one is set with [`with_retriever`](Self::with_retriever).
    pub fn new(config: VerifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            retriever: Arc::new(NoRetriever),
            config,
        })
    }

    /// Use `retriever` for key lookups.
    pub fn with_retriever(mut self, retriever: impl PublicKeyRetriever + 'static) -> Self {
        self.retriever = Arc::new(retriever);
        self
    }

    /// Use a shared retriever for key lookups.
    pub fn with_shared_retriever(mut self, retriever: Arc<dyn PublicKeyRetriever>) -> Self {
        self.retriever = retriever;
        self
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn parameters(&self) -> &Parameters {
        &self.config.parameters
    }

    pub fn retriever(&self) -> &dyn PublicKeyRetriever {
        self.retriever.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a signed payload at `now`, hashing it canonically.
    pub fn verify<T: Serialize>(&self, signed: &Signed<T>, now: Time) -> Result<SignatureKind> {
        let hash = match signed.signature() {
            Some(signature) if signed.kind().is_signed() => Some(signature.hash()?),
            _ => None,
        };
        self.dispatch(signed, hash.as_ref(), now)
    }

    /// Verify a signed payload against a hash computed by the caller.
    ///
    /// `hash` is ignored for unsigned kinds.
    pub fn verify_hash<T>(&self, signed: &Signed<T>, hash: &BigUint, now: Time) -> Result<SignatureKind> {
        self.dispatch(signed, Some(hash), now)
    }

    /// Verify at the current system time.
    pub fn verify_now<T: Serialize>(&self, signed: &Signed<T>) -> Result<SignatureKind> {
        self.verify(signed, Time::now())
    }

    /// Decode a tagged signed payload and verify it.
    pub fn decode_and_verify<T>(&self, bytes: &[u8], now: Time) -> Result<Signed<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let signed = Signed::from_bytes(bytes)?;
        self.verify(&signed, now)?;
        Ok(signed)
    }

    fn dispatch<T>(&self, signed: &Signed<T>, hash: Option<&BigUint>, now: Time) -> Result<SignatureKind> {
        let policy = &self.config.signatures;
        let kind = signed.kind();
        let retriever = self.retriever.as_ref();

        match signed {
            Signed::Null | Signed::Unsigned(_) => {
                if !policy.accept_unsigned {
                    tracing::warn!(?kind, "unsigned payload rejected");
                    return Err(SigError::Unsupported(kind).into());
                }
            }
            Signed::Client(_) => {
                tracing::warn!("client signatures cannot be verified here");
                return Err(SigError::Unsupported(kind).into());
            }
            Signed::Host(host) => {
                let hash = hash.ok_or(SigError::MissingField("hash"))?;
                host.verify_hash(retriever, hash, now, policy)?;
            }
            Signed::Credential(credential) => {
                let hash = hash.ok_or(SigError::MissingField("hash"))?;
                credential.verify_hash(retriever, hash, now, policy)?;
            }
        }

        tracing::debug!(?kind, "payload accepted");
        Ok(kind)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credentials
    // ─────────────────────────────────────────────────────────────────────────

    /// Commit to `permissions` with a fresh salt, revealing them or not.
    pub fn commit_permissions(
        &self,
        permissions: AgentPermissions,
        exposed: bool,
    ) -> HashedOrSaltedAgentPermissions {
        HashedOrSaltedAgentPermissions::with(permissions, exposed, &self.config.parameters)
    }

    /// The issuer key of a credential envelope.
    pub fn issuer_key(&self, exposed: &ExposedExponent) -> Result<PublicKey> {
        Ok(exposed.public_key(self.retriever.as_ref())?)
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
