//! Verification policy.

use serde::{Deserialize, Serialize};

use credkernel_core::Time;

/// Configuration for signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Signatures older than this are expired.
    pub max_age: Time,
    /// Credentials issued longer ago than this are expired.
    pub max_credential_age: Time,
    /// Whether unsigned payloads are accepted.
    pub accept_unsigned: bool,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            max_age: Time::YEAR,
            max_credential_age: Time::DAY,
            accept_unsigned: false,
        }
    }
}
