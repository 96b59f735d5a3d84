//! Resilient client subsystem.
//!
//! # Data Flow
//! ```text
//! feature code
//!     → services.rs (typed endpoint signatures)
//!     → api.rs (JSON/multipart serialization, error normalization)
//!     → gateway forwarder (/api/proxy/...)
//!     → remote origin
//! ```
//!
//! # Design Decisions
//! - No caching and no retry here; retry is the login flow's concern
//! - Every non-2xx collapses into one error kind carrying status + message

pub mod api;
pub mod services;

pub use api::{ApiClient, ClientError, RequestBody, RequestOptions};
