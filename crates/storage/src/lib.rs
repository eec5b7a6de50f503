//! Storage layer for the didapp ledger application.
//!
//! This crate provides everything that touches persisted bytes:
//! - The [`KvStore`] and [`Backend`] contracts, and the sled-backed [`Storage`]
//! - Write overlays for staging a transaction or a block
//! - The namespaced [`StateStore`] and node state record
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Application Layer                     │
//! │        (Router, Registry, Requests, Checkpoint)          │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                   Storage Layer                          │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────┐  │
//! │  │ StateStore  │  │  Overlay    │  │ Storage (DB)    │  │
//! │  │  - prefixes │  │  - tx       │  │  - sled wrapper │  │
//! │  │  - records  │  │  - block    │  │  - batches      │  │
//! │  │  - state    │  │  - readonly │  │                 │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────┘  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                    sled Database                         │
//! │              (Embedded Key-Value Store)                  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use didapp_storage::{Overlay, StateStore, Storage};
//! use didapp_core::{Address, RegistryEntry, Subject};
//!
//! let storage = Storage::open("./didapp_data").unwrap();
//!
//! // Stage writes, then inspect them through the same view
//! let overlay = Overlay::new(&storage);
//! let state = StateStore::new(&overlay);
//! let mut entry = RegistryEntry::new();
//! entry.insert(Address::new("10.0.0.1", "80"));
//! state.put_registry_entry(&Subject::new("ns1", "u1"), &entry).unwrap();
//! ```

pub mod db;
pub mod overlay;
pub mod state;

// Re-export commonly used types
pub use db::{Backend, BatchOp, KvStore, Result, Storage, StorageError};
pub use overlay::{into_batch, Overlay, ReadOnly, WriteSet};
pub use state::{StateStore, DOMAIN_PREFIX, STATE_KEY};
