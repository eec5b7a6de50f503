//! Host-facing application.
//!
//! This module wires the router, resolver and checkpoint engine to a storage
//! [`Backend`] and exposes the calls a consensus engine makes: Info, CheckTx,
//! DeliverTx, Commit and Query.

use crate::checkpoint::Checkpoint;
use crate::query::QueryResolver;
use crate::response::{InfoResponse, QueryResult, TxOutcome};
use crate::router::TxRouter;
use didapp_core::{Hash, NodeState};
use didapp_storage::{Backend, KvStore, Overlay, StateStore, Storage, WriteSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced to the host. Only backend faults end up here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] didapp_storage::StorageError),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Flush the backend to disk after every commit.
    pub flush_on_commit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            flush_on_commit: true,
        }
    }
}

/// The deterministic state machine driven by the consensus engine.
///
/// Calls that mutate state take `&mut self`, so block execution is
/// serialized by construction. Writes of the in-progress block are staged in
/// memory and only reach storage on [`Application::commit`].
pub struct Application<B = Storage> {
    /// Storage backend.
    storage: B,
    /// Configuration.
    config: AppConfig,
    /// Node state including transactions applied in the current block.
    state: NodeState,
    /// Node state as of the last commit.
    committed: NodeState,
    /// Writes staged by the current block.
    pending: WriteSet,
    router: TxRouter,
    resolver: Arc<QueryResolver>,
}

impl<B: Backend> Application<B> {
    /// Create the application, loading node state from `storage`.
    pub fn new(storage: B, config: AppConfig) -> Result<Self> {
        let state = StateStore::new(&storage).load_node_state()?;
        info!(
            size = state.size,
            height = state.height,
            app_hash = %state.app_hash,
            "node state loaded"
        );

        Ok(Self {
            storage,
            config,
            state,
            committed: state,
            pending: WriteSet::new(),
            router: TxRouter::new(),
            resolver: Arc::new(QueryResolver::new()),
        })
    }

    /// Report the last committed state.
    pub fn info(&self) -> InfoResponse {
        InfoResponse {
            data: self.committed.info_data(),
            last_block_height: self.committed.height,
            last_block_app_hash: self.committed.app_hash,
        }
    }

    /// Admission check before a transaction enters the pending pool.
    ///
    /// Always accepts; the transaction is fully checked on delivery.
    pub fn check_tx(&self, raw: &[u8]) -> TxOutcome {
        debug!(bytes = raw.len(), "check_tx");
        TxOutcome::ok("")
    }

    /// Apply one transaction of the current block.
    pub fn deliver_tx(&mut self, raw: &[u8]) -> Result<TxOutcome> {
        let block = Overlay::with_writes(&self.storage, std::mem::take(&mut self.pending));
        let result = self.router.apply(&block, &mut self.state, raw);
        self.pending = block.into_writes();
        Ok(result?)
    }

    /// Finalize the current block and return its checkpoint digest.
    ///
    /// If the backend rejects the batch, the block stays staged and a later
    /// call retries it. A failed flush is reported after the block has
    /// already become the committed state.
    pub fn commit(&mut self) -> Result<Hash> {
        let digest = Checkpoint::new(&self.storage).commit(&self.pending, &mut self.state)?;
        self.pending.clear();
        self.committed = self.state;

        if self.config.flush_on_commit {
            self.storage.flush()?;
        }
        Ok(digest)
    }

    /// Answer a query from the last committed state.
    ///
    /// Writes staged by the in-progress block are never visible here.
    pub fn query(&self, raw: &[u8]) -> Result<QueryResult> {
        Ok(self.resolver.query(&self.storage, raw)?)
    }

    /// Node state including the in-progress block.
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Number of keys staged by the in-progress block.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }
}

impl<B: Backend + Clone> Application<B> {
    /// A handle for answering queries from another thread.
    pub fn query_handle(&self) -> QueryHandle<B> {
        QueryHandle {
            storage: self.storage.clone(),
            resolver: Arc::clone(&self.resolver),
        }
    }
}

/// Cloneable reader of committed state. Thread-safe when the backend is.
#[derive(Clone)]
pub struct QueryHandle<B = Storage> {
    storage: B,
    resolver: Arc<QueryResolver>,
}

impl<B: KvStore> QueryHandle<B> {
    pub fn query(&self, raw: &[u8]) -> Result<QueryResult> {
        Ok(self.resolver.query(&self.storage, raw)?)
    }
}
