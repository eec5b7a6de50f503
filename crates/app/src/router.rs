//! Transaction router.
//!
//! Decodes a raw transaction, dispatches it by method to the registry or the
//! request manager, and folds any domain failure into a rejected outcome.

use crate::registry::Registry;
use crate::requests::{RequestError, RequestManager};
use crate::response::{ResultCode, TxOutcome};
use didapp_core::wire::{
    self, method, CreateIdpResponseParams, CreateRequestParams, RegisterMsgDestinationParams,
};
use didapp_core::{Address, Envelope, NodeState, Response, WireError};
use didapp_storage::{Overlay, StateStore, StorageError};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while applying a transaction.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("decode error: {0}")]
    Decode(#[from] WireError),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("request not found: {0}")]
    RequestNotFound(String),
}

impl ApplyError {
    /// Result code reported to the consensus engine.
    pub fn code(&self) -> ResultCode {
        match self {
            ApplyError::Storage(_) => ResultCode::StorageFault,
            ApplyError::Decode(_) => ResultCode::EncodingError,
            ApplyError::UnknownMethod(_) => ResultCode::UnknownMethod,
            ApplyError::InvalidPayload(_) => ResultCode::InvalidPayload,
            ApplyError::RequestNotFound(_) => ResultCode::RequestNotFound,
        }
    }
}

impl From<RequestError> for ApplyError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Storage(e) => ApplyError::Storage(e),
            RequestError::NotFound(id) => ApplyError::RequestNotFound(id),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApplyError>;

/// Handles one method. Returns the success log.
pub type TxHandler = fn(&StateStore<'_>, &Envelope) -> Result<String>;

/// Dispatch table from method name to handler.
pub struct TxRouter {
    handlers: HashMap<&'static str, TxHandler>,
}

impl TxRouter {
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, TxHandler> = HashMap::new();
        handlers.insert(method::REGISTER_MSG_DESTINATION, register_msg_destination);
        handlers.insert(method::CREATE_REQUEST, create_request);
        handlers.insert(method::CREATE_IDP_RESPONSE, create_idp_response);
        Self { handlers }
    }

    /// Decode and run a transaction against `store`.
    ///
    /// Writes land in `store` even if a later step fails; callers that need
    /// all-or-nothing semantics pass an overlay and discard it on error.
    pub fn dispatch(&self, store: &StateStore<'_>, raw: &[u8]) -> Result<String> {
        let envelope = wire::decode(raw)?;
        let handler = self
            .handlers
            .get(envelope.method.as_str())
            .ok_or_else(|| ApplyError::UnknownMethod(envelope.method.clone()))?;
        handler(store, &envelope)
    }

    /// Apply a transaction on top of the block's staged writes.
    ///
    /// On success the transaction's writes are merged into `block` and
    /// `state.size` grows by one. On rejection nothing changes. Storage
    /// faults are returned as errors rather than folded into the outcome.
    pub fn apply(
        &self,
        block: &Overlay<'_>,
        state: &mut NodeState,
        raw: &[u8],
    ) -> std::result::Result<TxOutcome, StorageError> {
        let tx = Overlay::new(block);
        let result = self.dispatch(&StateStore::new(&tx), raw);

        match result {
            Ok(log) => {
                let writes = tx.into_writes();
                debug!(keys = writes.len(), size = state.size + 1, "transaction applied");
                block.merge(writes);
                state.size += 1;
                Ok(TxOutcome::ok(log))
            }
            Err(ApplyError::Storage(e)) => Err(e),
            Err(e) => {
                warn!(code = %e.code(), error = %e, "transaction rejected");
                Ok(TxOutcome::rejected(e.code(), e.to_string()))
            }
        }
    }
}

impl Default for TxRouter {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Handlers
// =========================================================================

fn register_msg_destination(store: &StateStore<'_>, envelope: &Envelope) -> Result<String> {
    let params: RegisterMsgDestinationParams = envelope.params()?;

    if params.subjects.is_empty() {
        return Err(ApplyError::InvalidPayload("no subjects given".into()));
    }
    if let Some(subject) = params.subjects.iter().find(|s| !s.is_valid()) {
        return Err(ApplyError::InvalidPayload(format!(
            "subject needs a namespace without '|' and an id: {:?}",
            subject
        )));
    }
    let address = Address::new(params.host, params.port);
    if !address.is_valid() {
        return Err(ApplyError::InvalidPayload(
            "host and port must be non-empty".into(),
        ));
    }

    Registry::new(store).publish_for_all(&params.subjects, &address)?;
    Ok("success".into())
}

fn create_request(store: &StateStore<'_>, envelope: &Envelope) -> Result<String> {
    let params: CreateRequestParams = envelope.params()?;

    if params.request_id.is_empty() {
        return Err(ApplyError::InvalidPayload("requestId must be non-empty".into()));
    }

    RequestManager::new(store).create_request(
        &params.request_id,
        params.minimum_approvals,
        &params.payload_digest,
    )?;
    Ok("success".into())
}

fn create_idp_response(store: &StateStore<'_>, envelope: &Envelope) -> Result<String> {
    let params: CreateIdpResponseParams = envelope.params()?;

    if params.request_id.is_empty() {
        return Err(ApplyError::InvalidPayload("requestId must be non-empty".into()));
    }

    let response = Response {
        status: params.status,
        signature: params.signature,
    };
    RequestManager::new(store).record_response(&params.request_id, response)?;
    Ok("success".into())
}
