//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Origin used when neither config file nor environment supplies one.
pub const DEFAULT_UPSTREAM_URL: &str = "https://edunexus-backend-nv75.onrender.com";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Upstream origin the forwarder relays to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry policy for the login flow.
    pub auth_retry: AuthRetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            // Large enough for PDF uploads relayed to /admin/upload.
            max_body_size: 25 * 1024 * 1024,
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the remote origin (overridable via `EDUNEXUS_BACKEND_URL`).
    pub base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time budget for an inbound request, in seconds.
    /// Must cover a cold-starting origin (~30s) plus the relay round trip.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 75 }
    }
}

/// Retry policy for the authentication flow.
///
/// The backoff is deliberately fixed rather than exponential: cold-start
/// duration is roughly constant, so three evenly spaced attempts bound the
/// total wait at well under a minute.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthRetryConfig {
    /// Number of retries after the initial attempt.
    pub max_retries: u32,

    /// Fixed delay between attempts in milliseconds.
    pub backoff_ms: u64,
}

impl Default for AuthRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_ms: 3000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = GatewayConfig::default();
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.auth_retry.max_retries, 3);
        assert_eq!(config.auth_retry.backoff_ms, 3000);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.listener.max_body_size, 25 * 1024 * 1024);
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_URL);
    }
}
