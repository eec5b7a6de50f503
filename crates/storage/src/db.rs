//! sled database wrapper and the backend contracts.

use sled::Db;
use std::path::Path;
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Write attempted through a read-only view")]
    ReadOnly,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Raw get/set contract shared by the backend and write overlays.
///
/// Writes take `&self` so views can be layered without exclusive borrows,
/// matching sled's own API.
pub trait KvStore {
    /// Read the bytes stored under `key`, if any.
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_raw(&self, key: &[u8], value: &[u8]) -> Result<()>;
}

/// A store the application can commit blocks to.
///
/// Beyond get/set, a backend must apply a batch of writes atomically: after a
/// failed `batch` none of its operations may be visible.
pub trait Backend: KvStore {
    /// Apply multiple operations atomically.
    fn batch(&self, operations: Vec<BatchOp>) -> Result<()>;

    /// Make previously applied batches durable.
    fn flush(&self) -> Result<()>;
}

/// Wrapper around sled database.
///
/// Cloning is cheap and shares the same underlying database.
#[derive(Clone)]
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Open a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Open an in-memory database (for testing).
    pub fn open_temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Check if a key exists.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> Result<bool> {
        Ok(self.db.contains_key(key)?)
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

}

impl KvStore for Storage {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|bytes| bytes.to_vec()))
    }

    fn set_raw(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.insert(key, value)?;
        Ok(())
    }
}

impl Backend for Storage {
    /// Atomicity is provided by sled's `apply_batch`: readers observe either
    /// none or all of the batch.
    fn batch(&self, operations: Vec<BatchOp>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for op in operations {
            match op {
                BatchOp::Insert { key, value } => batch.insert(key, value),
            }
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// Batch operation for atomic updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Insert { key: Vec<u8>, value: Vec<u8> },
}
