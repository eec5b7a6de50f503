//! Verification requests and identity-provider responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict carried by a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Accept,
    Reject,
}

/// A participant's answer to a verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: ResponseStatus,
    pub signature: String,
}

impl Response {
    pub fn accept(signature: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Accept,
            signature: signature.into(),
        }
    }

    pub fn reject(signature: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Reject,
            signature: signature.into(),
        }
    }
}

/// Aggregate status derived from a request's responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Complete,
    Reject,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Complete => "complete",
            RequestStatus::Reject => "reject",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An approval workflow that completes once enough participants accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub request_id: String,
    pub minimum_approvals: u32,
    pub payload_digest: String,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl VerificationRequest {
    /// Create a request with no responses.
    pub fn new(
        request_id: impl Into<String>,
        minimum_approvals: u32,
        payload_digest: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            minimum_approvals,
            payload_digest: payload_digest.into(),
            responses: Vec::new(),
        }
    }

    /// Registry key for this request id (before namespacing by the store).
    /// Format: "Request|{request_id}"
    pub fn key_for(request_id: &str) -> String {
        format!("Request|{}", request_id)
    }

    /// Derive the aggregate status.
    ///
    /// The first Reject wins outright. Otherwise the request is complete once
    /// the number of Accepts reaches `minimum_approvals`.
    pub fn status(&self) -> RequestStatus {
        let mut accepts: u64 = 0;
        for response in &self.responses {
            match response.status {
                ResponseStatus::Reject => return RequestStatus::Reject,
                ResponseStatus::Accept => accepts += 1,
            }
        }

        if accepts >= u64::from(self.minimum_approvals) {
            RequestStatus::Complete
        } else {
            RequestStatus::Pending
        }
    }

    /// Number of Accept responses recorded so far.
    pub fn accept_count(&self) -> usize {
        self.responses
            .iter()
            .filter(|r| r.status == ResponseStatus::Accept)
            .count()
    }
}
