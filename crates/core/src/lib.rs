//! Core domain types for the didapp ledger application.
//!
//! This crate provides the types shared by storage and the application:
//! - Message destination registry (subjects, addresses)
//! - Verification requests and responses
//! - The singleton node state and its digest type
//! - The wire codec for transactions and queries

pub mod hash;
pub mod registry;
pub mod request;
pub mod state;
pub mod wire;

// Re-export commonly used types at the crate root
pub use hash::{hash, hash_concat, Hash, H256};
pub use registry::{Address, RegistryEntry, Subject};
pub use request::{RequestStatus, Response, ResponseStatus, VerificationRequest};
pub use state::NodeState;
pub use wire::{Envelope, WireError};
