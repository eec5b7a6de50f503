//! Deterministic state-transition application for the didapp ledger.
//!
//! A consensus engine feeds transactions in agreed order; every node that
//! applies the same sequence reaches the same state and the same checkpoint
//! digests. This crate brings together:
//! - **Registry**: publishes message destinations for subjects
//! - **Requests**: verification requests and their responses
//! - **Router**: decodes transactions and dispatches them by method
//! - **Query**: read-only lookups against committed state
//! - **Checkpoint**: block finalization and digest derivation
//!
//! # Example
//!
//! ```rust,no_run
//! use didapp_app::{AppConfig, Application};
//! use didapp_core::wire;
//! use didapp_storage::Storage;
//!
//! let storage = Storage::open("./didapp_data").unwrap();
//! let mut app = Application::new(storage, AppConfig::default()).unwrap();
//!
//! let tx = wire::encode(
//!     "CreateRequest",
//!     r#"{"requestId":"r1","minimumApprovals":2,"payloadDigest":"abc"}"#,
//! );
//! let outcome = app.deliver_tx(tx.as_bytes()).unwrap();
//! assert!(outcome.is_ok());
//!
//! let digest = app.commit().unwrap();
//! println!("committed {}", digest);
//! ```

pub mod application;
pub mod checkpoint;
pub mod query;
pub mod registry;
pub mod requests;
pub mod response;
pub mod router;

// Re-export commonly used types
pub use application::{AppConfig, AppError, Application, QueryHandle};
pub use checkpoint::{checkpoint_digest, Checkpoint};
pub use query::QueryResolver;
pub use registry::Registry;
pub use requests::{resolve_status, RequestError, RequestManager};
pub use response::{InfoResponse, QueryResult, ResultCode, TxOutcome};
pub use router::{ApplyError, TxRouter};
