//! Backend transport: normalized request/response types and the `Transport`
//! trait the billing flow is written against.
//!
//! The wire format is plain HTTP + JSON; successful responses arrive wrapped
//! in a `{data, meta: {requestId}}` envelope which this module unwraps before
//! handing the payload to callers.

mod error;
mod http;

pub use error::RequestError;
pub use http::HttpTransport;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// HTTP method subset used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request to the backend API, independent of the HTTP library in use.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the backend base URL, e.g. `/api/v1/billing/plans`.
    pub path: String,
    /// Query string parameters, appended in order.
    pub query: Vec<(String, String)>,
    /// JSON body for POST requests.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }
}

/// Raw response from the backend: status plus the parsed JSON body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Issues a single request/response exchange with the backend.
///
/// Implementations do no retrying and no caching; both live above this trait
/// so they can be tested against a stub transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, RequestError>;
}

/// Success envelope the backend wraps every payload in.
#[derive(Debug, Deserialize)]
struct Envelope {
    data: Value,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(rename = "requestId")]
    request_id: String,
}

/// Unwraps the `{data, meta}` envelope from a response, turning non-2xx
/// statuses into a `RequestError` that carries the numeric status.
pub fn unwrap_envelope(resp: ApiResponse) -> Result<Value, RequestError> {
    if !(200..300).contains(&resp.status) {
        return Err(RequestError::from_response(resp.status, &resp.body));
    }
    let envelope: Envelope = serde_json::from_value(resp.body)
        .map_err(|e| RequestError::message(format!("malformed response envelope: {e}")))?;
    tracing::trace!(request_id = %envelope.meta.request_id, "response envelope unwrapped");
    Ok(envelope.data)
}
