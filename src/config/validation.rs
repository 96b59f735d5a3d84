//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Validation is a pure function and returns all errors, not just the first.

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidUpstreamUrl(String),
    InvalidMetricsAddress(String),
    ZeroRequestTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid listener bind address: {}", addr)
            }
            ValidationError::InvalidUpstreamUrl(url) => {
                write!(f, "invalid upstream base url: {}", url)
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "invalid metrics address: {}", addr)
            }
            ValidationError::ZeroRequestTimeout => {
                write!(f, "timeouts.request_secs must be greater than zero")
            }
        }
    }
}

/// Validate a configuration before it is accepted into the system.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => {
            errors.push(ValidationError::InvalidUpstreamUrl(
                config.upstream.base_url.clone(),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.base_url = "ftp://example.com".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
    }
}
