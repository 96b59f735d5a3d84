//! Request and response translation for the relay.
//!
//! # Responsibilities
//! - Rebuild the upstream path from the trailing segments after the prefix
//! - Copy query parameters (last value wins on duplicate keys)
//! - Classify request bodies (multipart stays binary, the rest is text)
//! - Pick the relayed content-type (upstream's, defaulting to JSON)
//!
//! # Design Decisions
//! - Only the content-type header crosses the relay in either direction;
//!   auth, cookies and user-agent never reach the origin
//! - Body bytes are never inspected or transformed

use axum::body::Bytes;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use url::Url;

/// Fixed path prefix the forwarder is mounted on.
pub const PROXY_PREFIX: &str = "/api/proxy";

/// Hint returned to callers when the origin cannot be reached at all.
pub const COLD_START_ERROR: &str =
    "Backend unreachable. It may be cold-starting on Render (~30s). Please retry.";

/// Synthesized JSON error shape for an unreachable origin (HTTP 502).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn cold_start() -> Self {
        Self {
            error: COLD_START_ERROR.to_string(),
        }
    }
}

/// Request body as relayed to the origin.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardBody {
    Empty,
    /// JSON and other textual payloads.
    Text(String),
    /// Multipart payloads, kept byte-exact so boundaries survive.
    Binary(Bytes),
}

/// Upstream path for the trailing segments after [`PROXY_PREFIX`].
/// Zero segments map to `/`.
pub fn upstream_path(trailing: &str) -> String {
    format!("/{}", trailing.trim_start_matches('/'))
}

/// Collapse a raw query string into ordered pairs, last value winning on
/// duplicate keys. First-seen key order is preserved.
pub fn merge_query(raw: Option<&str>) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let Some(raw) = raw else {
        return pairs;
    };
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value.into_owned(),
            None => pairs.push((key.into_owned(), value.into_owned())),
        }
    }
    pairs
}

/// Build the full upstream URL for a relayed request.
pub fn upstream_url(
    base: &Url,
    path: &str,
    query: &[(String, String)],
) -> Result<Url, url::ParseError> {
    let mut url = base.join(path)?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}

/// Classify the inbound body for forwarding.
///
/// GET and HEAD carry no body. Multipart payloads must preserve exact byte
/// boundaries and stay binary; everything else is representable as text.
pub fn classify_request_body(
    method: &Method,
    content_type: Option<&str>,
    bytes: Bytes,
) -> ForwardBody {
    if method == Method::GET || method == Method::HEAD {
        return ForwardBody::Empty;
    }
    if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        ForwardBody::Binary(bytes)
    } else {
        ForwardBody::Text(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Whether a content-type marks a JSON-bearing body.
pub fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/json"))
}

/// Content-type echoed back to the caller. An origin that supplied none gets
/// the JSON passthrough default, even if the body is not valid JSON.
pub fn relayed_content_type(upstream: Option<&str>) -> String {
    match upstream {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => "application/json".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_segments_map_to_root() {
        assert_eq!(upstream_path(""), "/");
        assert_eq!(upstream_path("/"), "/");
    }

    #[test]
    fn segments_join_with_slashes() {
        assert_eq!(upstream_path("auth/login"), "/auth/login");
        assert_eq!(upstream_path("academic/subjects/cs101"), "/academic/subjects/cs101");
    }

    #[test]
    fn duplicate_query_keys_collapse_to_last_value() {
        let pairs = merge_query(Some("tab=1&q=rust&tab=2"));
        assert_eq!(
            pairs,
            vec![
                ("tab".to_string(), "2".to_string()),
                ("q".to_string(), "rust".to_string()),
            ]
        );
    }

    #[test]
    fn empty_query_yields_no_pairs() {
        assert!(merge_query(None).is_empty());
        assert!(merge_query(Some("")).is_empty());
    }

    #[test]
    fn upstream_url_carries_path_and_query() {
        let base = Url::parse("https://origin.example").unwrap();
        let query = vec![("q".to_string(), "a b".to_string())];
        let url = upstream_url(&base, "/search", &query).unwrap();
        assert_eq!(url.as_str(), "https://origin.example/search?q=a+b");
    }

    #[test]
    fn get_and_head_never_carry_a_body() {
        let bytes = Bytes::from_static(b"ignored");
        assert_eq!(
            classify_request_body(&Method::GET, Some("application/json"), bytes.clone()),
            ForwardBody::Empty
        );
        assert_eq!(
            classify_request_body(&Method::HEAD, None, bytes),
            ForwardBody::Empty
        );
    }

    #[test]
    fn multipart_stays_binary_everything_else_is_text() {
        let bytes = Bytes::from_static(b"--b\r\ndata\r\n--b--");
        let ct = "multipart/form-data; boundary=b";
        assert_eq!(
            classify_request_body(&Method::POST, Some(ct), bytes.clone()),
            ForwardBody::Binary(bytes)
        );
        assert_eq!(
            classify_request_body(&Method::POST, Some("application/json"), Bytes::from_static(b"{}")),
            ForwardBody::Text("{}".to_string())
        );
    }

    #[test]
    fn missing_content_type_defaults_to_json() {
        assert_eq!(relayed_content_type(None), "application/json");
        assert_eq!(relayed_content_type(Some("")), "application/json");
        assert_eq!(relayed_content_type(Some("application/pdf")), "application/pdf");
    }
}
