//! Signature kinds.
//!
//! A decoder reads the one-byte kind tag first and only then commits to a
//! payload shape and verification algorithm.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SigError};

/// How a payload is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SignatureKind {
    /// No signature structure at all.
    Null = 0,
    /// Signature structure without a signature.
    None = 1,
    /// Signed with a host's private key.
    Host = 2,
    /// Signed with a client's commitment.
    Client = 3,
    /// Signed under a credential.
    Credential = 4,
}

impl SignatureKind {
    /// The wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::Null),
            1 => Ok(Self::None),
            2 => Ok(Self::Host),
            3 => Ok(Self::Client),
            4 => Ok(Self::Credential),
            other => Err(SigError::UnknownKind(other)),
        }
    }

    /// Whether a signature of this kind carries a cryptographic value.
    pub fn is_signed(self) -> bool {
        matches!(self, Self::Host | Self::Client | Self::Credential)
    }
}
