//! Gateway HTTP server setup and the relay handler.
//!
//! # Responsibilities
//! - Create the Axum router with the wildcard relay route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch relayed requests to the upstream origin
//! - Synthesize the 502 error envelope when the origin is unreachable
//!
//! Retries never happen here. Retry policy belongs to callers; the login
//! flow layers its own bounded retry on top of the relay.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::GatewayConfig;
use crate::gateway::forward::{
    classify_request_body, merge_query, relayed_content_type, upstream_path, upstream_url,
    ErrorEnvelope, ForwardBody, PROXY_PREFIX,
};
use crate::observability::metrics;

/// Errors raised while constructing the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream base url: {0}")]
    UpstreamUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into the relay handler.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Url,
    pub client: reqwest::Client,
    pub max_body_size: usize,
}

/// HTTP server hosting the gateway forwarder.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let upstream = Url::parse(&config.upstream.base_url)?;
        let client = reqwest::Client::builder().build()?;

        let state = AppState {
            upstream,
            client,
            max_body_size: config.listener.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let methods = MethodFilter::GET
            .or(MethodFilter::POST)
            .or(MethodFilter::PUT)
            .or(MethodFilter::PATCH)
            .or(MethodFilter::DELETE);

        Router::new()
            .route(PROXY_PREFIX, on(methods, relay_handler))
            .route(&format!("{PROXY_PREFIX}/{{*path}}"), on(methods, relay_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let GatewayServer { router, config } = self;

        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %config.upstream.base_url,
            "gateway listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }
}

/// Relay handler: rebuilds the request against the origin and relays the
/// response back, byte-transparent apart from the content-type policy.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let method_str = method.to_string();
    let uri = request.uri().clone();

    let trailing = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or("");
    let path = upstream_path(trailing);
    let query = merge_query(uri.query());

    // Only content-type crosses the relay.
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let body_bytes = match axum::body::to_bytes(request.into_body(), state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read inbound body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
        }
    };
    let body = classify_request_body(&method, content_type.as_deref(), body_bytes);

    let url = match upstream_url(&state.upstream, &path, &query) {
        Ok(url) => url,
        Err(err) => {
            tracing::error!(error = %err, path = %path, "failed to build upstream url");
            metrics::record_relay(&method_str, 502, start);
            return bad_gateway();
        }
    };

    tracing::debug!(method = %method, url = %url, "relay ->");

    let mut upstream_req = state.client.request(method, url);
    if let Some(ct) = &content_type {
        upstream_req = upstream_req.header(header::CONTENT_TYPE, ct);
    }
    upstream_req = match body {
        ForwardBody::Empty => upstream_req,
        ForwardBody::Text(text) => upstream_req.body(text),
        ForwardBody::Binary(bytes) => upstream_req.body(bytes),
    };

    let upstream_res = match upstream_req.send().await {
        Ok(res) => res,
        Err(err) => {
            // Connection failure, timeout or DNS failure. A remote-returned
            // error status never lands here; those pass through verbatim.
            tracing::warn!(error = %err, "upstream dispatch failed");
            metrics::record_relay(&method_str, 502, start);
            return bad_gateway();
        }
    };

    let status = upstream_res.status();
    let content_type = relayed_content_type(
        upstream_res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    );

    tracing::debug!(status = %status, content_type = %content_type, "relay <-");

    let relayed = match upstream_res.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read upstream body");
            metrics::record_relay(&method_str, 502, start);
            return bad_gateway();
        }
    };

    metrics::record_relay(&method_str, status.as_u16(), start);

    match Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(relayed))
    {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "failed to assemble relayed response");
            bad_gateway()
        }
    }
}

fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, Json(ErrorEnvelope::cold_start())).into_response()
}
