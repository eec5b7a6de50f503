//! Message destination registry types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separates the components of a registry key.
const KEY_SEPARATOR: char = '|';

/// Identifies an entity that can own message destinations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub namespace: String,
    pub id: String,
}

impl Subject {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }

    /// Registry key for this subject (before namespacing by the store).
    /// Format: "MsgDestination|{namespace}|{id}"
    ///
    /// Distinct valid subjects never share a key: the namespace holds no
    /// separator, so the first `|` after the prefix always ends it.
    pub fn registry_key(&self) -> String {
        format!("MsgDestination|{}|{}", self.namespace, self.id)
    }

    /// Both components must be non-empty, and the namespace must not
    /// contain the key separator.
    pub fn is_valid(&self) -> bool {
        !self.namespace.is_empty()
            && !self.namespace.contains(KEY_SEPARATOR)
            && !self.id.is_empty()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.id)
    }
}

/// A network destination. Compared by full equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    #[serde(alias = "ip")]
    pub host: String,
    pub port: String,
}

impl Address {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.host.is_empty() && !self.port.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Ordered, duplicate-free list of addresses published for one subject.
///
/// Entries are only ever appended; insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryEntry(Vec<Address>);

impl RegistryEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `address` unless an equal one is already present.
    /// Returns true if the entry changed.
    pub fn insert(&mut self, address: Address) -> bool {
        if self.contains(&address) {
            return false;
        }
        self.0.push(address);
        true
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    pub fn addresses(&self) -> &[Address] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
