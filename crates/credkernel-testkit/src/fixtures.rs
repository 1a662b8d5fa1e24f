//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, OnceLock};

use num_bigint::BigUint;

use credkernel::{Verifier, VerifierConfig};
use credkernel_core::{
    HostIdentifier, InternalNonHostIdentifier, Parameters, PrivateKey, SemanticType, Time,
    DEFAULT_PUBLIC_EXPONENT,
};
use credkernel_perms::{
    AgentPermissions, ExposedExponent, HashedOrSaltedAgentPermissions, StaticKeyRetriever,
};
use credkernel_sig::{CredentialSignature, HostSignature, Signature, Signed};

use crate::vectors::Prime;

/// The toy key `n = 33, e = 3, d = 7`. Only usable with explicit small hashes.
pub fn toy_key() -> PrivateKey {
    PrivateKey::from_primes(&BigUint::from(3u32), &BigUint::from(11u32), &BigUint::from(3u32))
        .expect("toy key is valid")
}

/// A 1128-bit key from the Mersenne primes `2^521 - 1` and `2^607 - 1`.
///
/// Large enough for 256-bit hashes. Built once per process.
pub fn large_key() -> PrivateKey {
    static KEY: OnceLock<PrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        PrivateKey::from_primes(
            &Prime::Mersenne(521).value(),
            &Prime::Mersenne(607).value(),
            &BigUint::from(DEFAULT_PUBLIC_EXPONENT),
        )
        .expect("mersenne key is valid")
    })
    .clone()
}

/// A fixed "now": 2024-01-01T00:00:00Z.
pub fn fixed_now() -> Time {
    Time::from_millis(1_704_067_200_000)
}

/// A host with a key registered in an in-memory retriever.
pub struct TestFixture {
    pub host: HostIdentifier,
    pub key: PrivateKey,
    pub retriever: Arc<StaticKeyRetriever>,
    pub now: Time,
}

impl TestFixture {
    /// `example.com` holding [`large_key`], valid since the epoch.
    pub fn new() -> Self {
        Self::with_key("example.com", large_key())
    }

    /// A fixture for `host` holding `key`.
    pub fn with_key(host: &str, key: PrivateKey) -> Self {
        let host = HostIdentifier::new(host).expect("fixture host is valid");
        let retriever = StaticKeyRetriever::new().with_key(host.clone(), Time::ZERO, key.public_key());
        Self {
            host,
            key,
            retriever: Arc::new(retriever),
            now: fixed_now(),
        }
    }

    /// An identity managed by this host.
    pub fn identity(&self, local: &str) -> InternalNonHostIdentifier {
        InternalNonHostIdentifier::new(format!("{local}@{}", self.host))
            .expect("fixture identity is valid")
    }

    /// The issuance slot containing `now`.
    pub fn issuance(&self) -> Time {
        self.now.round_down(Time::HALF_HOUR)
    }

    /// A verifier using this fixture's retriever.
    pub fn verifier(&self, config: VerifierConfig) -> Verifier {
        Verifier::new(config)
            .expect("fixture config is valid")
            .with_shared_retriever(self.retriever.clone())
    }

    /// An envelope issued by `local@host` at [`issuance`](Self::issuance).
    pub fn exposed(&self, local: &str, permissions: AgentPermissions, expose: bool) -> ExposedExponent {
        let committed = HashedOrSaltedAgentPermissions::with(permissions, expose, &Parameters::default());
        ExposedExponent::builder(self.identity(local), self.issuance(), committed)
            .build()
            .expect("fixture envelope is valid")
    }

    /// `element` signed by this host at `now`.
    pub fn host_signed(&self, element: String) -> Signed<String> {
        let signature = Signature::about(self.host.clone(), self.now, element);
        Signed::Host(HostSignature::sign(signature, self.host.clone(), &self.key).expect("fixture signing succeeds"))
    }

    /// `element` signed under a fresh credential of `local@host` at `now`.
    pub fn credential_signed(&self, local: &str, element: String) -> Signed<String> {
        let exposed = self.exposed(local, read_permissions(&["email@core.example.com"]), true);
        let signature = Signature::about(self.identity(local), self.now, element);
        Signed::Credential(
            CredentialSignature::issue(signature, exposed, &self.key).expect("fixture issuing succeeds"),
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only permissions for the given semantic types.
pub fn read_permissions(types: &[&str]) -> AgentPermissions {
    types
        .iter()
        .map(|t| (SemanticType::new(*t).expect("fixture semantic type is valid"), false))
        .collect()
}
