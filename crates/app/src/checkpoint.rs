//! Block finalization.

use didapp_core::{hash_concat, Hash, NodeState};
use didapp_storage::{into_batch, Backend, Result, StateStore, WriteSet};
use tracing::info;

/// Domain tag mixed into every checkpoint digest.
const CHECKPOINT_DOMAIN: &[u8] = b"didapp.checkpoint";

/// Digest for a given applied-transaction count.
///
/// A pure function of replicated state: no clock, no randomness.
pub fn checkpoint_digest(size: u64) -> Hash {
    hash_concat(&[CHECKPOINT_DOMAIN, &size.to_be_bytes()])
}

/// Finalizes blocks: derives the digest, advances height, persists.
pub struct Checkpoint<'a> {
    backend: &'a dyn Backend,
}

impl<'a> Checkpoint<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Commit the block.
    ///
    /// The block's staged writes and the updated node state are written in a
    /// single atomic batch. `state` is only updated once the batch succeeds,
    /// and `writes` is left for the caller to retry with or discard.
    pub fn commit(&self, writes: &WriteSet, state: &mut NodeState) -> Result<Hash> {
        let next = NodeState {
            size: state.size,
            height: state.height + 1,
            app_hash: checkpoint_digest(state.size),
        };

        let keys = writes.len();
        let mut ops = into_batch(writes.clone());
        ops.push(StateStore::node_state_op(&next)?);
        self.backend.batch(ops)?;

        *state = next;
        info!(
            height = state.height,
            size = state.size,
            keys,
            app_hash = %state.app_hash,
            "block committed"
        );
        Ok(state.app_hash)
    }
}
