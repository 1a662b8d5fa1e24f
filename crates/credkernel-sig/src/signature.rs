//! The unsigned base of every signature.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use credkernel_core::{canonical, Identifier, Time};

use crate::config::SignatureConfig;
use crate::error::{Result, SigError};
use crate::kind::SignatureKind;

/// A payload with an optional subject and time.
///
/// Built once when signing, or rebuilt from decoded fields when
/// verifying. Never mutated in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature<T> {
    subject: Option<Identifier>,
    time: Option<Time>,
    element: Option<T>,
}

impl<T> Signature<T> {
    pub fn new(subject: Option<Identifier>, time: Option<Time>, element: Option<T>) -> Self {
        Self {
            subject,
            time,
            element,
        }
    }

    /// An element about `subject`, timestamped `time`.
    pub fn about(subject: impl Into<Identifier>, time: Time, element: T) -> Self {
        Self::new(Some(subject.into()), Some(time), Some(element))
    }

    /// The empty signature.
    pub fn null() -> Self {
        Self::new(None, None, None)
    }

    pub fn subject(&self) -> Option<&Identifier> {
        self.subject.as_ref()
    }

    pub fn time(&self) -> Option<Time> {
        self.time
    }

    pub fn element(&self) -> Option<&T> {
        self.element.as_ref()
    }

    pub fn into_element(self) -> Option<T> {
        self.element
    }

    /// [`SignatureKind::Null`] when every field is absent,
    /// [`SignatureKind::None`] otherwise.
    pub fn kind(&self) -> SignatureKind {
        if self.subject.is_none() && self.time.is_none() && self.element.is_none() {
            SignatureKind::Null
        } else {
            SignatureKind::None
        }
    }

    /// The time, which signed kinds require.
    pub fn required_time(&self) -> Result<Time> {
        self.time.ok_or(SigError::MissingField("time"))
    }

    /// Reject the signature if it is older than `config.max_age`.
    pub fn check_recency(&self, now: Time, config: &SignatureConfig) -> Result<()> {
        let time = self.required_time()?;
        if time.is_older_than(config.max_age, now) {
            return Err(SigError::ExpiredSignature { time });
        }
        Ok(())
    }
}

impl<T: Serialize> Signature<T> {
    /// Hash of the canonical encoding of subject, time, and element.
    pub fn hash(&self) -> Result<BigUint> {
        Ok(canonical::hash_value(self)?)
    }
}
