//! Same-origin gateway and resilient API client for the EduNexus platform.

pub mod auth;
pub mod client;
pub mod config;
pub mod gateway;
pub mod lifecycle;
pub mod observability;

pub use auth::{LoginFlow, LoginOutcome, SessionHolder};
pub use client::ApiClient;
pub use config::GatewayConfig;
pub use gateway::GatewayServer;
pub use lifecycle::Shutdown;
