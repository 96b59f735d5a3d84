//! Typed request wrapper over the gateway forwarder.
//!
//! Every feature module reaches the origin through this client, never
//! directly; requests are addressed to `{gateway}/api/proxy{endpoint}` so
//! browser-side callers have no cross-origin concerns at all.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::gateway::forward::is_json;
use crate::gateway::PROXY_PREFIX;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response, from the origin or synthesized by the forwarder.
    /// Carries the best-effort message and the status that produced it.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// The gateway itself could not be reached.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Endpoint did not form a valid URL against the gateway base.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Response body could not be decoded into the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Status code for API errors, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 502/503 means the relay is up but the origin is still waking.
    pub fn is_cold_start(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE)
        )
    }
}

/// Outbound body variants.
pub enum RequestBody {
    /// Serialized as JSON with `content-type: application/json`.
    Json(Value),
    /// Sent as-is; the transport sets the multipart boundary.
    Multipart(reqwest::multipart::Form),
}

/// Options bag for a single request.
#[derive(Default)]
pub struct RequestOptions {
    /// HTTP method, defaulting to GET.
    pub method: Method,
    pub body: Option<RequestBody>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_json(value: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(RequestBody::Json(value)),
            headers: HeaderMap::new(),
        }
    }

    pub fn multipart(form: reqwest::multipart::Form) -> Self {
        Self {
            method: Method::POST,
            body: Some(RequestBody::Multipart(form)),
            headers: HeaderMap::new(),
        }
    }
}

/// The single call-site abstraction for reaching the origin.
pub struct ApiClient {
    http: reqwest::Client,
    gateway_base: Url,
}

impl ApiClient {
    /// Create a client addressing the gateway at `gateway_base`
    /// (e.g. `http://127.0.0.1:3000`).
    pub fn new(gateway_base: Url) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, gateway_base })
    }

    /// Issue a request through the gateway and decode the result.
    ///
    /// On 2xx, JSON-bearing responses deserialize into `T`; anything else is
    /// returned as raw text (use `T = String`). On non-2xx this raises
    /// [`ClientError::Api`] with the message resolved from the JSON body's
    /// `message` field, then its `error` field, then the serialized body,
    /// then plain text, then the HTTP status reason.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let url = self
            .gateway_base
            .join(&format!("{PROXY_PREFIX}{endpoint}"))?;

        tracing::debug!(method = %options.method, url = %url, "api request");

        let mut req = self
            .http
            .request(options.method, url)
            .headers(options.headers);
        req = match options.body {
            Some(RequestBody::Json(value)) => req.json(&value),
            Some(RequestBody::Multipart(form)) => req.multipart(form),
            None => req,
        };

        let response = req.send().await?;
        let status = response.status();
        let json_bearing = is_json(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );

        if !status.is_success() {
            let message = if json_bearing {
                match response.json::<Value>().await {
                    Ok(body) => resolve_error_message(&body),
                    Err(_) => String::new(),
                }
            } else {
                response.text().await.unwrap_or_default()
            };
            let message = if message.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                message
            };
            tracing::debug!(status = %status, message = %message, "api error");
            return Err(ClientError::Api { status, message });
        }

        if json_bearing {
            Ok(response.json::<T>().await?)
        } else {
            let text = response.text().await?;
            Ok(serde_json::from_value(Value::String(text))?)
        }
    }
}

/// Best-effort human-readable message from a JSON error body.
fn resolve_error_message(body: &Value) -> String {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        if !message.is_empty() {
            return message.to_string();
        }
    }
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        if !error.is_empty() {
            return error.to_string();
        }
    }
    body.to_string()
}
