//! Wire codec for transactions and queries.
//!
//! A raw transaction (or query) is base64 text which decodes to a UTF-8
//! string of the form `<method>|<json-params>`. The method is everything up
//! to the first separator; the params are everything after it.

use crate::registry::Subject;
use crate::request::{RequestStatus, ResponseStatus};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separates the method token from the JSON params.
pub const SEPARATOR: char = '|';

/// Method names matched verbatim (case-sensitive).
pub mod method {
    pub const REGISTER_MSG_DESTINATION: &str = "RegisterMsgDestination";
    pub const CREATE_REQUEST: &str = "CreateRequest";
    pub const CREATE_IDP_RESPONSE: &str = "CreateIdpResponse";
    pub const GET_MSG_DESTINATION: &str = "GetMsgDestination";
    pub const GET_REQUEST: &str = "GetRequest";
}

/// Errors decoding a transaction or query.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid transport encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("decoded payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("missing '|' separator between method and params")]
    MissingSeparator,

    #[error("cannot decode params for {method}: {source}")]
    Unmarshal {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, WireError>;

/// A decoded `<method>|<params>` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub method: String,
    pub params: String,
}

impl Envelope {
    /// Split a plain `<method>|<params>` string on the first separator.
    pub fn parse(text: &str) -> Result<Self> {
        let (method, params) = text
            .split_once(SEPARATOR)
            .ok_or(WireError::MissingSeparator)?;
        Ok(Self {
            method: method.to_string(),
            params: params.to_string(),
        })
    }

    /// Decode params into the schema expected by this envelope's method.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.params).map_err(|source| WireError::Unmarshal {
            method: self.method.clone(),
            source,
        })
    }
}

/// Transport-decode raw bytes and split them into an envelope.
pub fn decode(raw: &[u8]) -> Result<Envelope> {
    let bytes = BASE64.decode(raw)?;
    let text = String::from_utf8(bytes)?;
    Envelope::parse(&text)
}

/// Build the transport-encoded form of `<method>|<params>`.
pub fn encode(method: &str, params: &str) -> String {
    BASE64.encode(format!("{}{}{}", method, SEPARATOR, params))
}

/// Transport-encode an already formed `<method>|<params>` string.
pub fn encode_text(text: &str) -> String {
    BASE64.encode(text)
}

// =========================================================================
// Param schemas
// =========================================================================

/// Params of `RegisterMsgDestination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMsgDestinationParams {
    #[serde(alias = "users")]
    pub subjects: Vec<Subject>,
    #[serde(alias = "ip")]
    pub host: String,
    pub port: String,
}

/// Params of `CreateRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestParams {
    pub request_id: String,
    #[serde(alias = "minIdp")]
    pub minimum_approvals: u32,
    #[serde(alias = "messageHash")]
    pub payload_digest: String,
}

/// Params of `CreateIdpResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdpResponseParams {
    pub request_id: String,
    pub status: ResponseStatus,
    pub signature: String,
}

/// Params of `GetRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRequestParams {
    pub request_id: String,
}

/// Value returned by `GetRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRequestResult {
    pub status: RequestStatus,
    pub payload_digest: String,
}
