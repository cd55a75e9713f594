//! `reqwest`-backed transport for the backend API.
//!
//! Normalizes reqwest failures into [`RequestError`] so the retry classifier
//! sees a timeout as a "timeout" message and a connect failure as a "network"
//! message even when no HTTP status exists.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{ApiRequest, ApiResponse, Method, RequestError, Transport};

/// HTTP transport bound to one backend base URL and an optional bearer token.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpTransport {
    /// Creates a transport for the given base URL (e.g. `https://api.aegis.app`).
    pub fn new(base_url: &str, bearer_token: Option<String>) -> Result<Self, RequestError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RequestError::message(format!("invalid backend URL {base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| RequestError::message(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            bearer_token,
        })
    }

    fn request_url(&self, req: &ApiRequest) -> Result<Url, RequestError> {
        let mut url = self
            .base_url
            .join(&req.path)
            .map_err(|e| RequestError::message(format!("invalid request path {}: {e}", req.path)))?;
        if !req.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &req.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

/// Maps a reqwest error to a normalized error whose message the classifier
/// recognizes (timeout / network indicators).
fn normalize_send_error(e: reqwest::Error) -> RequestError {
    let status = e.status().map(|s| s.as_u16());
    let message = if e.is_timeout() {
        format!("request timeout: {e}")
    } else if e.is_connect() {
        format!("network connection failed: {e}")
    } else {
        e.to_string()
    };
    RequestError { status, message }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, RequestError> {
        let url = self.request_url(&req)?;
        tracing::debug!(method = ?req.method, %url, "sending backend request");

        let mut builder = match req.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(normalize_send_error)?;
        let status = response.status().as_u16();
        // Error bodies may be empty or non-JSON; treat those as null so the
        // caller still sees the status.
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(ApiResponse { status, body })
    }
}
