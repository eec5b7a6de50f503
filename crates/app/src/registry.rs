//! Message destination registry.

use didapp_core::{Address, Subject};
use didapp_storage::{Result, StateStore};
use tracing::debug;

/// Publishes addresses for subjects, skipping ones already present.
pub struct Registry<'s, 'a> {
    store: &'s StateStore<'a>,
}

impl<'s, 'a> Registry<'s, 'a> {
    pub fn new(store: &'s StateStore<'a>) -> Self {
        Self { store }
    }

    /// Append `address` to the subject's entry unless it is already listed.
    ///
    /// Idempotent. Returns true if the entry was written.
    pub fn publish_address(&self, subject: &Subject, address: &Address) -> Result<bool> {
        let mut entry = self.store.registry_entry(subject)?;
        if !entry.insert(address.clone()) {
            debug!(%subject, %address, "address already published");
            return Ok(false);
        }
        self.store.put_registry_entry(subject, &entry)?;
        debug!(%subject, %address, count = entry.len(), "address published");
        Ok(true)
    }

    /// Publish one address for several subjects.
    ///
    /// Every subject is attempted even if some already hold the address.
    /// Returns how many entries changed.
    pub fn publish_for_all(&self, subjects: &[Subject], address: &Address) -> Result<usize> {
        let mut changed = 0;
        for subject in subjects {
            if self.publish_address(subject, address)? {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
