//! Agent permissions: which attribute types an agent may read or write.

use std::collections::BTreeMap;

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use credkernel_core::{Canonical, SemanticType};

/// An immutable set of permissions.
///
/// Each entry grants read access to an attribute type, and write access
/// too when its flag is set. Entries are kept sorted so the canonical
/// encoding does not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentPermissions(BTreeMap<SemanticType, bool>);

impl AgentPermissions {
    /// No permissions at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a permission. Granting write access wins over read-only.
    pub fn with(mut self, attribute_type: SemanticType, writable: bool) -> Self {
        let entry = self.0.entry(attribute_type).or_insert(false);
        *entry |= writable;
        self
    }

    pub fn can_read(&self, attribute_type: &SemanticType) -> bool {
        self.0.contains_key(attribute_type)
    }

    pub fn can_write(&self, attribute_type: &SemanticType) -> bool {
        self.0.get(attribute_type).copied().unwrap_or(false)
    }

    /// Whether everything `other` grants is also granted here.
    pub fn covers(&self, other: &AgentPermissions) -> bool {
        other
            .iter()
            .all(|(t, w)| self.can_read(t) && (!w || self.can_write(t)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SemanticType, bool)> {
        self.0.iter().map(|(t, w)| (t, *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SemanticType, bool)> for AgentPermissions {
    fn from_iter<I: IntoIterator<Item = (SemanticType, bool)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::none(), |perms, (t, w)| perms.with(t, w))
    }
}

impl Canonical for AgentPermissions {
    /// An array of `[type, writable]` pairs in type order.
    fn to_cbor_value(&self) -> Value {
        Value::Array(
            self.iter()
                .map(|(t, w)| Value::Array(vec![Value::Text(t.to_string()), Value::Bool(w)]))
                .collect(),
        )
    }
}
