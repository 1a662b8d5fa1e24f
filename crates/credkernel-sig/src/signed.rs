//! Signatures of any kind.
//!
//! On the wire a signed payload is its [`SignatureKind`] tag byte followed
//! by the CBOR encoding of the kind's payload. Decoding reads the tag
//! first and only then picks the payload type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use credkernel_core::{CoreError, Identifier, Time};

use crate::credential::CredentialSignature;
use crate::error::Result;
use crate::host::HostSignature;
use crate::kind::SignatureKind;
use crate::signature::Signature;

/// A payload with whatever signature it came with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signed<T> {
    Null,
    Unsigned(Signature<T>),
    Host(HostSignature<T>),
    /// Client signatures are carried but not verified by this crate.
    Client(Signature<T>),
    Credential(CredentialSignature<T>),
}

impl<T> Signed<T> {
    pub fn kind(&self) -> SignatureKind {
        match self {
            Signed::Null => SignatureKind::Null,
            Signed::Unsigned(_) => SignatureKind::None,
            Signed::Host(_) => SignatureKind::Host,
            Signed::Client(_) => SignatureKind::Client,
            Signed::Credential(_) => SignatureKind::Credential,
        }
    }

    /// The unsigned base, if there is one.
    pub fn signature(&self) -> Option<&Signature<T>> {
        match self {
            Signed::Null => None,
            Signed::Unsigned(s) | Signed::Client(s) => Some(s),
            Signed::Host(h) => Some(h.signature()),
            Signed::Credential(c) => Some(c.signature()),
        }
    }

    pub fn subject(&self) -> Option<&Identifier> {
        self.signature().and_then(Signature::subject)
    }

    pub fn time(&self) -> Option<Time> {
        self.signature().and_then(Signature::time)
    }

    pub fn element(&self) -> Option<&T> {
        self.signature().and_then(Signature::element)
    }
}

impl<T: Serialize> Signed<T> {
    /// Tag byte followed by the CBOR payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![self.kind().tag()];
        let written = match self {
            Signed::Null => Ok(()),
            Signed::Unsigned(s) | Signed::Client(s) => ciborium::into_writer(s, &mut buf),
            Signed::Host(h) => ciborium::into_writer(h, &mut buf),
            Signed::Credential(c) => ciborium::into_writer(c, &mut buf),
        };
        written.map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }
}

impl<T: DeserializeOwned> Signed<T> {
    /// Decode a tag byte and the payload it announces.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&tag, payload) = bytes
            .split_first()
            .ok_or_else(|| CoreError::DecodingError("empty input".into()))?;
        let kind = SignatureKind::from_tag(tag)?;

        let signed = match kind {
            SignatureKind::Null => {
                if !payload.is_empty() {
                    return Err(CoreError::DecodingError("null signature with payload".into()).into());
                }
                Signed::Null
            }
            SignatureKind::None => Signed::Unsigned(decode(payload)?),
            SignatureKind::Host => Signed::Host(decode(payload)?),
            SignatureKind::Client => Signed::Client(decode(payload)?),
            SignatureKind::Credential => Signed::Credential(decode(payload)?),
        };
        Ok(signed)
    }
}

fn decode<U: DeserializeOwned>(payload: &[u8]) -> Result<U> {
    Ok(ciborium::from_reader(payload).map_err(|e| CoreError::DecodingError(e.to_string()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SigError;
    use credkernel_core::{BigUint, HostIdentifier};

    fn host() -> HostIdentifier {
        HostIdentifier::new("example.com").unwrap()
    }

    #[test]
    fn test_kinds_and_accessors() {
        let unsigned = Signed::Unsigned(Signature::about(host(), Time::HALF_HOUR, 3u32));
        assert_eq!(unsigned.kind(), SignatureKind::None);
        assert_eq!(unsigned.element(), Some(&3));
        assert_eq!(unsigned.time(), Some(Time::HALF_HOUR));
        assert_eq!(unsigned.subject(), Some(&Identifier::from(host())));

        let null = Signed::<u32>::Null;
        assert_eq!(null.kind(), SignatureKind::Null);
        assert!(null.element().is_none());
    }

    #[test]
    fn test_tag_leads_the_encoding() {
        let host_signed = Signed::Host(HostSignature::from_parts(
            Signature::about(host(), Time::HALF_HOUR, "x".to_string()),
            host(),
            BigUint::from(16u32),
        ));
        let bytes = host_signed.to_bytes().unwrap();
        assert_eq!(bytes[0], SignatureKind::Host.tag());
        assert_eq!(Signed::<String>::from_bytes(&bytes).unwrap(), host_signed);

        assert_eq!(Signed::<String>::Null.to_bytes().unwrap(), vec![0]);
        assert_eq!(Signed::<String>::from_bytes(&[0]).unwrap(), Signed::Null);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(
            Signed::<u32>::from_bytes(&[]),
            Err(SigError::Core(CoreError::DecodingError(_)))
        ));
        assert!(matches!(
            Signed::<u32>::from_bytes(&[9]),
            Err(SigError::UnknownKind(9))
        ));
        assert!(matches!(
            Signed::<u32>::from_bytes(&[0, 1]),
            Err(SigError::Core(CoreError::DecodingError(_)))
        ));
        // host tag with an unsigned payload
        let unsigned = Signed::Unsigned(Signature::about(host(), Time::HALF_HOUR, 3u32));
        let mut bytes = unsigned.to_bytes().unwrap();
        bytes[0] = SignatureKind::Host.tag();
        assert!(Signed::<u32>::from_bytes(&bytes).is_err());
    }
}
