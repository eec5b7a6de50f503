//! In-memory write overlays used to stage a transaction or a block.

use crate::db::{BatchOp, KvStore, Result, StorageError};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Staged writes, ordered by key so flushing is deterministic.
pub type WriteSet = BTreeMap<Vec<u8>, Vec<u8>>;

/// Buffers writes on top of a base store.
///
/// Reads see the overlay's own writes first, then fall through to the base.
/// Nothing reaches the base until the owner takes the writes out with
/// [`Overlay::into_writes`] and applies them.
pub struct Overlay<'a> {
    base: &'a dyn KvStore,
    writes: RefCell<WriteSet>,
}

impl<'a> Overlay<'a> {
    /// Create an empty overlay over `base`.
    pub fn new(base: &'a dyn KvStore) -> Self {
        Self::with_writes(base, WriteSet::new())
    }

    /// Create an overlay that already holds `writes`.
    pub fn with_writes(base: &'a dyn KvStore, writes: WriteSet) -> Self {
        Self {
            base,
            writes: RefCell::new(writes),
        }
    }

    /// Fold another write set into this one; later values win.
    pub fn merge(&self, writes: WriteSet) {
        self.writes.borrow_mut().extend(writes);
    }

    /// Number of staged keys.
    pub fn len(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.borrow().is_empty()
    }

    /// Consume the overlay, returning the staged writes.
    pub fn into_writes(self) -> WriteSet {
        self.writes.into_inner()
    }
}

impl KvStore for Overlay<'_> {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(value) = self.writes.borrow().get(key) {
            return Ok(Some(value.clone()));
        }
        self.base.get_raw(key)
    }

    fn set_raw(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.writes.borrow_mut().insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

/// Read-only view over a store. Any write fails with [`StorageError::ReadOnly`].
pub struct ReadOnly<'a>(pub &'a dyn KvStore);

impl KvStore for ReadOnly<'_> {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.0.get_raw(key)
    }

    fn set_raw(&self, _key: &[u8], _value: &[u8]) -> Result<()> {
        Err(StorageError::ReadOnly)
    }
}

/// Turn a write set into batch inserts, in key order.
pub fn into_batch(writes: WriteSet) -> Vec<BatchOp> {
    writes
        .into_iter()
        .map(|(key, value)| BatchOp::Insert { key, value })
        .collect()
}
