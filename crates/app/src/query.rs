//! Read-only query resolution.

use crate::requests::resolve_status;
use crate::response::{QueryResult, ResultCode};
use didapp_core::wire::{self, method, GetRequestParams, GetRequestResult};
use didapp_core::{Envelope, Subject};
use didapp_storage::{KvStore, ReadOnly, StateStore, StorageError};
use std::collections::HashMap;
use tracing::debug;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Handles one query method.
pub type QueryHandler = fn(&StateStore<'_>, &Envelope) -> Result<QueryResult>;

/// Dispatch table from query method to handler.
pub struct QueryResolver {
    handlers: HashMap<&'static str, QueryHandler>,
}

impl QueryResolver {
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, QueryHandler> = HashMap::new();
        handlers.insert(method::GET_MSG_DESTINATION, get_msg_destination);
        handlers.insert(method::GET_REQUEST, get_request);
        Self { handlers }
    }

    /// Resolve a raw query against `kv`.
    ///
    /// `kv` is wrapped read-only, so a query can never mutate state. Decode
    /// problems and misses come back as an absent value with a log; only
    /// storage faults are errors.
    pub fn query(&self, kv: &dyn KvStore, raw: &[u8]) -> Result<QueryResult> {
        let envelope = match wire::decode(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "query decode failed");
                return Ok(QueryResult::empty(ResultCode::EncodingError, e.to_string()));
            }
        };

        let Some(handler) = self.handlers.get(envelope.method.as_str()) else {
            debug!(method = %envelope.method, "unknown query method");
            return Ok(QueryResult::empty(
                ResultCode::UnknownMethod,
                format!("wrong method name: {}", envelope.method),
            ));
        };

        let view = ReadOnly(kv);
        handler(&StateStore::new(&view), &envelope)
    }
}

impl Default for QueryResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn get_msg_destination(store: &StateStore<'_>, envelope: &Envelope) -> Result<QueryResult> {
    let subject: Subject = match envelope.params() {
        Ok(subject) => subject,
        Err(e) => return Ok(QueryResult::empty(ResultCode::EncodingError, e.to_string())),
    };
    if !subject.is_valid() {
        return Ok(QueryResult::empty(
            ResultCode::InvalidPayload,
            format!("invalid subject: {}", subject),
        ));
    }

    match store.get_raw(&subject.registry_key())? {
        Some(bytes) => Ok(QueryResult::found(bytes)),
        None => Ok(QueryResult::not_found("not found")),
    }
}

fn get_request(store: &StateStore<'_>, envelope: &Envelope) -> Result<QueryResult> {
    let params: GetRequestParams = match envelope.params() {
        Ok(params) => params,
        Err(e) => return Ok(QueryResult::empty(ResultCode::EncodingError, e.to_string())),
    };

    let Some(request) = store.request(&params.request_id)? else {
        return Ok(QueryResult::not_found("not found"));
    };

    let result = GetRequestResult {
        status: resolve_status(&request),
        payload_digest: request.payload_digest,
    };
    Ok(QueryResult::found(serde_json::to_vec(&result)?))
}
