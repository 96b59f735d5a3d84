//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; request IDs flow through the relay
//! - Metrics are cheap (atomic increments), exposed for Prometheus scrape

pub mod logging;
pub mod metrics;
