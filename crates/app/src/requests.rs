//! Verification request lifecycle.

use didapp_core::{RequestStatus, Response, VerificationRequest};
use didapp_storage::{StateStore, StorageError};
use thiserror::Error;
use tracing::debug;

/// Errors raised while managing requests.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("request not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RequestError>;

/// Creates requests and records responses against them.
pub struct RequestManager<'s, 'a> {
    store: &'s StateStore<'a>,
}

impl<'s, 'a> RequestManager<'s, 'a> {
    pub fn new(store: &'s StateStore<'a>) -> Self {
        Self { store }
    }

    /// Create a request with no responses.
    ///
    /// An existing request with the same id is overwritten, responses included.
    pub fn create_request(
        &self,
        request_id: &str,
        minimum_approvals: u32,
        payload_digest: &str,
    ) -> Result<VerificationRequest> {
        let request = VerificationRequest::new(request_id, minimum_approvals, payload_digest);
        self.store.put_request(&request)?;
        debug!(request_id, minimum_approvals, "request created");
        Ok(request)
    }

    /// Append a response to an existing request.
    ///
    /// Responses are kept in arrival order and never deduplicated; the schema
    /// carries no responder identity. Returns the status after the append.
    pub fn record_response(&self, request_id: &str, response: Response) -> Result<RequestStatus> {
        let mut request = self
            .get(request_id)?
            .ok_or_else(|| RequestError::NotFound(request_id.to_string()))?;

        request.responses.push(response);
        self.store.put_request(&request)?;

        let status = resolve_status(&request);
        debug!(
            request_id,
            responses = request.responses.len(),
            accepts = request.accept_count(),
            %status,
            "response recorded"
        );
        Ok(status)
    }

    pub fn get(&self, request_id: &str) -> Result<Option<VerificationRequest>> {
        Ok(self.store.request(request_id)?)
    }
}

/// Status of a request: `reject` on the first Reject, `complete` once enough
/// Accepts were recorded, `pending` otherwise.
pub fn resolve_status(request: &VerificationRequest) -> RequestStatus {
    request.status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use didapp_storage::Storage;

    #[test]
    fn test_create_then_get() {
        let storage = Storage::open_temporary().unwrap();
        let store = StateStore::new(&storage);
        let manager = RequestManager::new(&store);

        manager.create_request("r1", 2, "abc").unwrap();
        let request = manager.get("r1").unwrap().unwrap();
        assert_eq!(request.minimum_approvals, 2);
        assert_eq!(request.payload_digest, "abc");
        assert!(request.responses.is_empty());
        assert_eq!(resolve_status(&request), RequestStatus::Pending);
    }

    #[test]
    fn test_create_overwrites_existing() {
        let storage = Storage::open_temporary().unwrap();
        let store = StateStore::new(&storage);
        let manager = RequestManager::new(&store);

        manager.create_request("r1", 2, "abc").unwrap();
        manager
            .record_response("r1", Response::accept("s1"))
            .unwrap();
        manager.create_request("r1", 3, "def").unwrap();

        let request = manager.get("r1").unwrap().unwrap();
        assert_eq!(request.minimum_approvals, 3);
        assert_eq!(request.payload_digest, "def");
        assert!(request.responses.is_empty());
    }

    #[test]
    fn test_record_response_missing_request() {
        let storage = Storage::open_temporary().unwrap();
        let store = StateStore::new(&storage);
        let manager = RequestManager::new(&store);

        let result = manager.record_response("ghost", Response::accept("s1"));
        assert!(matches!(result, Err(RequestError::NotFound(id)) if id == "ghost"));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_threshold_reached() {
        let storage = Storage::open_temporary().unwrap();
        let store = StateStore::new(&storage);
        let manager = RequestManager::new(&store);

        manager.create_request("r1", 2, "abc").unwrap();
        let status = manager
            .record_response("r1", Response::accept("s1"))
            .unwrap();
        assert_eq!(status, RequestStatus::Pending);

        let status = manager
            .record_response("r1", Response::accept("s2"))
            .unwrap();
        assert_eq!(status, RequestStatus::Complete);
    }

    #[test]
    fn test_duplicate_responses_are_kept_in_order() {
        let storage = Storage::open_temporary().unwrap();
        let store = StateStore::new(&storage);
        let manager = RequestManager::new(&store);

        manager.create_request("r1", 2, "abc").unwrap();
        manager
            .record_response("r1", Response::accept("same"))
            .unwrap();
        manager
            .record_response("r1", Response::accept("same"))
            .unwrap();

        let request = manager.get("r1").unwrap().unwrap();
        assert_eq!(request.responses.len(), 2);
        assert_eq!(resolve_status(&request), RequestStatus::Complete);
    }

    #[test]
    fn test_late_reject_flips_complete() {
        let storage = Storage::open_temporary().unwrap();
        let store = StateStore::new(&storage);
        let manager = RequestManager::new(&store);

        manager.create_request("r1", 1, "abc").unwrap();
        manager
            .record_response("r1", Response::accept("s1"))
            .unwrap();
        let status = manager
            .record_response("r1", Response::reject("s2"))
            .unwrap();
        assert_eq!(status, RequestStatus::Reject);

        // Accepts after a reject are recorded but cannot undo it
        let status = manager
            .record_response("r1", Response::accept("s3"))
            .unwrap();
        assert_eq!(status, RequestStatus::Reject);
        assert_eq!(manager.get("r1").unwrap().unwrap().responses.len(), 3);
    }
}
