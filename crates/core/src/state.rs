//! Node state: the singleton record tracked across blocks.

use crate::hash::Hash;
use serde::{Deserialize, Serialize};

/// Applied-transaction count, committed block height and the last checkpoint digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeState {
    /// Number of successfully applied transactions.
    pub size: u64,
    /// Number of committed blocks.
    pub height: u64,
    /// Digest produced by the last commit.
    pub app_hash: Hash,
}

impl NodeState {
    /// Info payload reported to the consensus engine: `{"size":N}`.
    pub fn info_data(&self) -> String {
        format!("{{\"size\":{}}}", self.size)
    }
}
