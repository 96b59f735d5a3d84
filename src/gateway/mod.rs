//! Gateway forwarder subsystem.
//!
//! # Data Flow
//! ```text
//! Browser / client request
//!     → server.rs (Axum wildcard route under /api/proxy)
//!     → forward.rs (path join, query merge, body classification)
//!     → upstream origin (reqwest dispatch)
//!     → forward.rs (content-type echo, JSON default)
//!     → relayed response
//! ```
//!
//! # Design Decisions
//! - The forwarder is stateless; each relay is independent
//! - Byte-transparent relay: the payload is never inspected or rewritten
//! - An unreachable origin maps to one synthesized shape: 502 + `{ error }`

pub mod forward;
pub mod server;

pub use forward::{ErrorEnvelope, COLD_START_ERROR, PROXY_PREFIX};
pub use server::{AppState, GatewayServer, ServerError};
