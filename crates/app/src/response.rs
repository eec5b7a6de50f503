//! Results handed back to the consensus engine.

use didapp_core::Hash;
use std::fmt;

/// Numeric result code. Zero means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ResultCode {
    Ok = 0,
    /// Bad transport encoding, missing separator, or params of the wrong shape.
    EncodingError = 1,
    UnknownMethod = 2,
    InvalidPayload = 3,
    RequestNotFound = 4,
    /// Query miss. Not a fault.
    NotFound = 5,
    /// Backend fault. Returned to the host as an error, never as an outcome.
    StorageFault = 6,
}

impl ResultCode {
    pub fn value(self) -> u32 {
        self as u32
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.value())
    }
}

/// Outcome of DeliverTx or CheckTx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub code: ResultCode,
    pub log: String,
}

impl TxOutcome {
    pub fn ok(log: impl Into<String>) -> Self {
        Self {
            code: ResultCode::Ok,
            log: log.into(),
        }
    }

    pub fn rejected(code: ResultCode, log: impl Into<String>) -> Self {
        Self {
            code,
            log: log.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

/// Result of a read-only query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub code: ResultCode,
    /// Serialized record, absent on a miss or an invalid query.
    pub value: Option<Vec<u8>>,
    pub log: String,
}

impl QueryResult {
    pub fn found(value: Vec<u8>) -> Self {
        Self {
            code: ResultCode::Ok,
            value: Some(value),
            log: String::new(),
        }
    }

    pub fn not_found(log: impl Into<String>) -> Self {
        Self::empty(ResultCode::NotFound, log)
    }

    pub fn empty(code: ResultCode, log: impl Into<String>) -> Self {
        Self {
            code,
            value: None,
            log: log.into(),
        }
    }
}

/// Info reported for handshake and sync comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoResponse {
    /// `{"size":N}`
    pub data: String,
    pub last_block_height: u64,
    pub last_block_app_hash: Hash,
}
