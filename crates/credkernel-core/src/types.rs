//! Strong type definitions for credkernel.
//!
//! Identifiers and timestamps are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CoreError, Result};

/// A point in time, in Unix milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time(pub i64);

impl Time {
    pub const SECOND: Self = Self(1_000);
    pub const MINUTE: Self = Self(60 * 1_000);
    pub const HALF_HOUR: Self = Self(30 * 60 * 1_000);
    pub const HOUR: Self = Self(60 * 60 * 1_000);
    pub const DAY: Self = Self(24 * 60 * 60 * 1_000);
    pub const YEAR: Self = Self(365 * 24 * 60 * 60 * 1_000);

    /// The zero time (Unix epoch).
    pub const ZERO: Self = Self(0);

    /// Create from Unix milliseconds.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Get Unix milliseconds.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// The current time.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert a system time. Times before the epoch are negative;
    /// out-of-range times saturate.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self(i64::try_from(after.as_millis()).unwrap_or(i64::MAX)),
            Err(before) => {
                let millis = i64::try_from(before.duration().as_millis()).unwrap_or(i64::MAX);
                Self(-millis)
            }
        }
    }

    /// Round down to a multiple of `interval`.
    ///
    /// # Panics
    ///
    /// If `interval` is not positive.
    pub fn round_down(&self, interval: Time) -> Time {
        assert!(interval.0 > 0, "rounding interval must be positive");
        Self(self.0.div_euclid(interval.0) * interval.0)
    }

    /// Whether this time is a multiple of `interval`.
    pub fn is_multiple_of(&self, interval: Time) -> bool {
        interval.0 > 0 && self.0.rem_euclid(interval.0) == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `self + other`, saturating at the bounds of `i64`.
    pub fn add(&self, other: Time) -> Time {
        Self(self.0.saturating_add(other.0))
    }

    /// `self - other`, saturating at the bounds of `i64`.
    pub fn subtract(&self, other: Time) -> Time {
        Self(self.0.saturating_sub(other.0))
    }

    /// Whether this time lies more than `age` before `now`.
    pub fn is_older_than(&self, age: Time, now: Time) -> bool {
        *self < now.subtract(age)
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({})", self.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<i64> for Time {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

fn is_host_label_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn validate_host(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 253
        && s.split('.').all(|label| {
            !label.is_empty() && !label.starts_with('-') && label.chars().all(is_host_label_char)
        })
}

/// Identifier of a host, e.g. `example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostIdentifier(String);

impl HostIdentifier {
    /// Parse and validate a host identifier.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if !validate_host(&s) {
            return Err(CoreError::InvalidIdentifier(format!("invalid host: {s:?}")));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a non-host entity managed by a host, e.g. `alice@example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InternalNonHostIdentifier(String);

impl InternalNonHostIdentifier {
    /// Parse and validate an identifier of the form `local@host`.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        let valid = match s.split_once('@') {
            Some((local, host)) => {
                !local.is_empty()
                    && local
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || "._-+".contains(c))
                    && validate_host(host)
            }
            None => false,
        };
        if !valid {
            return Err(CoreError::InvalidIdentifier(format!(
                "invalid internal identifier: {s:?}"
            )));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The host that manages this identity.
    pub fn host(&self) -> HostIdentifier {
        // Validated at construction.
        let (_, host) = self.0.split_once('@').unwrap_or(("", &self.0));
        HostIdentifier(host.to_string())
    }
}

/// Any identifier a signature can be about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Identifier {
    Host(HostIdentifier),
    Internal(InternalNonHostIdentifier),
}

impl Identifier {
    /// Parse a host or internal identifier, deciding by the presence of `@`.
    pub fn parse(s: &str) -> Result<Self> {
        if s.contains('@') {
            Ok(Self::Internal(InternalNonHostIdentifier::new(s)?))
        } else {
            Ok(Self::Host(HostIdentifier::new(s)?))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Host(h) => h.as_str(),
            Self::Internal(i) => i.as_str(),
        }
    }
}

/// The type of an attribute or role, e.g. `email@core.example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemanticType(String);

impl SemanticType {
    /// Parse and validate a semantic type.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if InternalNonHostIdentifier::new(s.as_str()).is_err() {
            return Err(CoreError::InvalidIdentifier(format!(
                "invalid semantic type: {s:?}"
            )));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_conversions {
    ($($ty:ident),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = CoreError;

            fn try_from(s: String) -> Result<Self> {
                Self::new(s)
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> String {
                id.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    )*};
}

string_conversions!(HostIdentifier, InternalNonHostIdentifier, SemanticType);

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HostIdentifier> for Identifier {
    fn from(id: HostIdentifier) -> Self {
        Self::Host(id)
    }
}

impl From<InternalNonHostIdentifier> for Identifier {
    fn from(id: InternalNonHostIdentifier) -> Self {
        Self::Internal(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_down_half_hour() {
        let t = Time::from_millis(Time::HALF_HOUR.0 * 5 + 12_345);
        assert_eq!(t.round_down(Time::HALF_HOUR), Time::from_millis(Time::HALF_HOUR.0 * 5));
        assert!(t.round_down(Time::HALF_HOUR).is_multiple_of(Time::HALF_HOUR));
        assert_eq!(Time::HALF_HOUR.0, 1_800_000);
    }

    #[test]
    fn test_from_system_time() {
        use std::time::Duration;

        let after = UNIX_EPOCH + Duration::from_millis(1_704_067_200_000);
        assert_eq!(Time::from_system_time(after), Time::from_millis(1_704_067_200_000));

        let before = UNIX_EPOCH - Duration::from_millis(5_000);
        assert_eq!(Time::from_system_time(before), Time::from_millis(-5_000));

        assert!(Time::now().is_positive());
    }

    #[test]
    fn test_round_down_negative() {
        let t = Time::from_millis(-1);
        assert_eq!(t.round_down(Time::HALF_HOUR), Time::from_millis(-Time::HALF_HOUR.0));
    }

    #[test]
    fn test_is_older_than() {
        let now = Time::from_millis(10_000);
        assert!(Time::from_millis(1_000).is_older_than(Time::SECOND, now));
        assert!(!Time::from_millis(9_000).is_older_than(Time::SECOND, now));
    }

    #[test]
    fn test_host_identifier_validation() {
        assert!(HostIdentifier::new("example.com").is_ok());
        assert!(HostIdentifier::new("Example.com").is_err());
        assert!(HostIdentifier::new("").is_err());
        assert!(HostIdentifier::new("a..b").is_err());
    }

    #[test]
    fn test_internal_identifier_host() {
        let id = InternalNonHostIdentifier::new("alice@example.com").unwrap();
        assert_eq!(id.host(), HostIdentifier::new("example.com").unwrap());
        assert!(InternalNonHostIdentifier::new("example.com").is_err());
        assert!(InternalNonHostIdentifier::new("@example.com").is_err());
    }

    #[test]
    fn test_identifier_parse() {
        assert!(matches!(Identifier::parse("example.com"), Ok(Identifier::Host(_))));
        assert!(matches!(
            Identifier::parse("bob@example.com"),
            Ok(Identifier::Internal(_))
        ));
    }

    #[test]
    fn test_identifier_serde_validates() {
        let ok: HostIdentifier = serde_json::from_str(r#""example.com""#).unwrap();
        assert_eq!(ok.as_str(), "example.com");
        assert!(serde_json::from_str::<HostIdentifier>(r#""not a host""#).is_err());
    }
}
