//! Namespaced application state over a raw key-value store.

use crate::db::{BatchOp, KvStore, Result};
use didapp_core::{NodeState, RegistryEntry, Subject, VerificationRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reserved key holding the node state record.
pub const STATE_KEY: &[u8] = b"stateKey";

/// Prefix applied to every domain key, keeping them apart from [`STATE_KEY`].
pub const DOMAIN_PREFIX: &[u8] = b"kvPairKey:";

/// Typed, namespaced access to application entities.
///
/// Records are stored as JSON. This layer performs no validation.
pub struct StateStore<'a> {
    kv: &'a dyn KvStore,
}

impl<'a> StateStore<'a> {
    /// Create a new StateStore over the given store or overlay.
    pub fn new(kv: &'a dyn KvStore) -> Self {
        Self { kv }
    }

    /// Create a prefixed domain key.
    /// Format: "kvPairKey:" + key
    pub fn domain_key(key: &str) -> Vec<u8> {
        let mut full = DOMAIN_PREFIX.to_vec();
        full.extend_from_slice(key.as_bytes());
        full
    }

    /// Raw bytes stored under a domain key.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.kv.get_raw(&Self::domain_key(key))
    }

    /// Retrieve and deserialize a domain record.
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a domain record.
    pub fn put<V: Serialize>(&self, key: &str, value: &V) -> Result<()> {
        let encoded = serde_json::to_vec(value)?;
        self.kv.set_raw(&Self::domain_key(key), &encoded)
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Registry entry for a subject, empty if none was published.
    pub fn registry_entry(&self, subject: &Subject) -> Result<RegistryEntry> {
        Ok(self
            .get::<RegistryEntry>(&subject.registry_key())?
            .unwrap_or_default())
    }

    pub fn put_registry_entry(&self, subject: &Subject, entry: &RegistryEntry) -> Result<()> {
        self.put(&subject.registry_key(), entry)
    }

    pub fn request(&self, request_id: &str) -> Result<Option<VerificationRequest>> {
        self.get(&VerificationRequest::key_for(request_id))
    }

    pub fn put_request(&self, request: &VerificationRequest) -> Result<()> {
        self.put(&VerificationRequest::key_for(&request.request_id), request)
    }

    // =========================================================================
    // Node State
    // =========================================================================

    /// Load the node state, or the genesis state if none was ever saved.
    pub fn load_node_state(&self) -> Result<NodeState> {
        match self.kv.get_raw(STATE_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(NodeState::default()),
        }
    }

    /// Batch insert for the node state record, to be applied with the block.
    pub fn node_state_op(state: &NodeState) -> Result<BatchOp> {
        Ok(BatchOp::Insert {
            key: STATE_KEY.to_vec(),
            value: serde_json::to_vec(state)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Backend, Storage};
    use didapp_core::{Address, Hash};

    fn setup() -> Storage {
        Storage::open_temporary().unwrap()
    }

    #[test]
    fn test_domain_keys_are_prefixed() {
        let key = StateStore::domain_key("Request|r1");
        assert_eq!(key, b"kvPairKey:Request|r1");
        assert!(!key.starts_with(STATE_KEY));
    }

    #[test]
    fn test_put_get_record() {
        let storage = setup();
        let store = StateStore::new(&storage);

        store.put("counter", &42u64).unwrap();
        assert_eq!(store.get::<u64>("counter").unwrap(), Some(42));
        assert_eq!(store.get::<u64>("missing").unwrap(), None);

        // Stored under the namespaced key
        assert!(storage.contains(b"kvPairKey:counter").unwrap());
        assert!(!storage.contains(b"counter").unwrap());
    }

    #[test]
    fn test_registry_entry_defaults_empty() {
        let storage = setup();
        let store = StateStore::new(&storage);
        let subject = Subject::new("ns1", "u1");

        assert!(store.registry_entry(&subject).unwrap().is_empty());

        let mut entry = RegistryEntry::new();
        entry.insert(Address::new("10.0.0.1", "80"));
        store.put_registry_entry(&subject, &entry).unwrap();

        assert_eq!(store.registry_entry(&subject).unwrap(), entry);
        assert_eq!(
            store.get_raw("MsgDestination|ns1|u1").unwrap().unwrap(),
            br#"[{"host":"10.0.0.1","port":"80"}]"#.to_vec()
        );
    }

    #[test]
    fn test_request_roundtrip() {
        let storage = setup();
        let store = StateStore::new(&storage);

        assert!(store.request("r1").unwrap().is_none());
        let request = VerificationRequest::new("r1", 2, "abc");
        store.put_request(&request).unwrap();
        assert_eq!(store.request("r1").unwrap(), Some(request));
    }

    #[test]
    fn test_node_state_persistence() {
        let storage = setup();
        let store = StateStore::new(&storage);

        assert_eq!(store.load_node_state().unwrap(), NodeState::default());

        let state = NodeState {
            size: 5,
            height: 2,
            app_hash: Hash([7u8; 32]),
        };
        storage
            .batch(vec![StateStore::node_state_op(&state).unwrap()])
            .unwrap();

        assert_eq!(store.load_node_state().unwrap(), state);
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let storage = setup();
        storage.set_raw(b"kvPairKey:Request|bad", b"{oops").unwrap();

        let store = StateStore::new(&storage);
        assert!(store.request("bad").is_err());
    }
}
