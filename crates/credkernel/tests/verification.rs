//! End-to-end signature verification.

use std::sync::Arc;
use std::thread;

use credkernel::core::{HostIdentifier, Time};
use credkernel::perms::StaticKeyRetriever;
use credkernel::sig::{HostSignature, Signature};
use credkernel::{
    BigUint, KernelError, KeyLookupError, PublicKey, PublicKeyRetriever, SigError, SignatureKind,
    Signed, Verifier, VerifierConfig,
};
use credkernel_testkit::{toy_key, TestFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn toy_rsa_scenario() {
    let public_key = PublicKey::new(BigUint::from(33u32), BigUint::from(3u32)).unwrap();
    let hash = BigUint::from(4u32);

    assert_eq!(toy_key().sign(&hash), BigUint::from(16u32));
    HostSignature::<()>::verify_signature(&public_key, &BigUint::from(16u32), &hash).unwrap();
    assert!(matches!(
        HostSignature::<()>::verify_signature(&public_key, &BigUint::from(17u32), &hash),
        Err(SigError::InvalidHostSignature)
    ));
}

#[test]
fn host_signature_end_to_end() {
    init_tracing();
    let fixture = TestFixture::new();
    let verifier = fixture.verifier(VerifierConfig::default());

    let signed = fixture.host_signed("hello".to_string());
    assert_eq!(verifier.verify(&signed, fixture.now).unwrap(), SignatureKind::Host);

    let bytes = signed.to_bytes().unwrap();
    let decoded: Signed<String> = verifier.decode_and_verify(&bytes, fixture.now).unwrap();
    assert_eq!(decoded.element(), Some(&"hello".to_string()));
}

#[test]
fn tampered_host_signature_rejected() {
    init_tracing();
    let fixture = TestFixture::new();
    let verifier = fixture.verifier(VerifierConfig::default());

    let Signed::Host(original) = fixture.host_signed("hello".to_string()) else {
        panic!("fixture produces host signatures");
    };
    let forged = Signed::Host(HostSignature::from_parts(
        Signature::about(fixture.host.clone(), fixture.now, "goodbye".to_string()),
        original.signer().clone(),
        original.value().clone(),
    ));
    assert!(matches!(
        verifier.verify(&forged, fixture.now),
        Err(KernelError::Sig(SigError::InvalidHostSignature))
    ));
}

#[test]
fn expired_host_signature_rejected() {
    let fixture = TestFixture::new();
    let verifier = fixture.verifier(VerifierConfig::default());
    let later = fixture.now.add(Time::YEAR).add(Time::DAY);

    let result = verifier.verify(&fixture.host_signed("hello".to_string()), later);
    assert!(matches!(
        result,
        Err(KernelError::Sig(SigError::ExpiredHostSignature { .. }))
    ));
}

#[test]
fn credential_signature_end_to_end() {
    init_tracing();
    let fixture = TestFixture::new();
    let verifier = fixture.verifier(VerifierConfig::default());

    let signed = fixture.credential_signed("alice", "hello".to_string());
    assert_eq!(
        verifier.verify(&signed, fixture.now).unwrap(),
        SignatureKind::Credential
    );

    let Signed::Credential(credential) = &signed else {
        panic!("fixture produces credential signatures");
    };
    let key = verifier.issuer_key(credential.exposed()).unwrap();
    assert_eq!(key, fixture.key.public_key());

    let covered = Signed::Credential(credential.with_covered_permissions());
    verifier.verify(&covered, fixture.now).unwrap();
}

#[test]
fn credential_with_wrong_issuer_key_rejected() {
    let fixture = TestFixture::new();
    // The retriever knows a different key for the issuer's host.
    let other = TestFixture::with_key(
        "example.com",
        credkernel::PrivateKey::from_primes(
            &credkernel_testkit::Prime::Mersenne(607).value(),
            &credkernel_testkit::Prime::Mersenne(1279).value(),
            &BigUint::from(65_537u32),
        )
        .unwrap(),
    );
    let verifier = other.verifier(VerifierConfig::default());

    let result = verifier.verify(&fixture.credential_signed("alice", "hello".to_string()), fixture.now);
    assert!(matches!(
        result,
        Err(KernelError::Sig(SigError::InvalidCredentialsSignature))
    ));
}

#[test]
fn each_verifier_consults_its_own_retriever() {
    let fixture = TestFixture::new();
    let signed = fixture.credential_signed("alice", "hello".to_string());

    fixture
        .verifier(VerifierConfig::default())
        .verify(&signed, fixture.now)
        .unwrap();

    let rotated = TestFixture::with_key(
        "example.com",
        credkernel::PrivateKey::from_primes(
            &credkernel_testkit::Prime::Mersenne(607).value(),
            &credkernel_testkit::Prime::Mersenne(1279).value(),
            &BigUint::from(65_537u32),
        )
        .unwrap(),
    );
    assert!(matches!(
        rotated.verifier(VerifierConfig::default()).verify(&signed, fixture.now),
        Err(KernelError::Sig(SigError::InvalidCredentialsSignature))
    ));

    let empty = Verifier::new(VerifierConfig::default())
        .unwrap()
        .with_retriever(StaticKeyRetriever::new());
    assert!(matches!(
        empty.verify(&signed, fixture.now),
        Err(KernelError::Sig(SigError::KeyLookup(KeyLookupError::NotFound { .. })))
    ));

    // The first verifier is unaffected by the others.
    fixture
        .verifier(VerifierConfig::default())
        .verify(&signed, fixture.now)
        .unwrap();
}

struct Unreachable;

impl PublicKeyRetriever for Unreachable {
    fn retrieve(&self, host: &HostIdentifier, _time: Time) -> Result<PublicKey, KeyLookupError> {
        Err(KeyLookupError::Unavailable {
            host: host.clone(),
            reason: "connection refused".into(),
        })
    }
}

#[test]
fn lookup_failures_are_distinguishable() {
    let fixture = TestFixture::new();
    let signed = fixture.credential_signed("alice", "hello".to_string());

    let transient = Verifier::new(VerifierConfig::default())
        .unwrap()
        .with_retriever(Unreachable)
        .verify(&signed, fixture.now)
        .unwrap_err();
    assert!(transient.is_retryable());

    let permanent = Verifier::new(VerifierConfig::default())
        .unwrap()
        .with_retriever(StaticKeyRetriever::new())
        .verify(&signed, fixture.now)
        .unwrap_err();
    assert!(matches!(
        permanent,
        KernelError::Sig(SigError::KeyLookup(KeyLookupError::NotFound { .. }))
    ));
    assert!(!permanent.is_retryable());
}

#[test]
fn inactive_signer_rejected() {
    let mut retriever = StaticKeyRetriever::new();
    let fixture = TestFixture::new();
    retriever.insert(fixture.host.clone(), Time::ZERO, fixture.key.public_key());
    retriever.deactivate(fixture.host.clone());

    let verifier = Verifier::new(VerifierConfig::default())
        .unwrap()
        .with_retriever(retriever);
    assert!(matches!(
        verifier.verify(&fixture.host_signed("hello".to_string()), fixture.now),
        Err(KernelError::Sig(SigError::InactiveSignature { .. }))
    ));
}

#[test]
fn rejections_do_not_affect_other_verifications() {
    let fixture = Arc::new(TestFixture::new());
    let verifier = fixture.verifier(VerifierConfig::default());

    thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let fixture = Arc::clone(&fixture);
                let verifier = verifier.clone();
                s.spawn(move || {
                    let signed = fixture.host_signed(format!("message {i}"));
                    let now = if i % 2 == 0 {
                        fixture.now
                    } else {
                        fixture.now.add(Time::YEAR).add(Time::DAY)
                    };
                    verifier.verify(&signed, now).is_ok()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), i % 2 == 0);
        }
    });
}
