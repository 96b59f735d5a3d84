//! Lifecycle management (startup, shutdown signals).

pub mod shutdown;

pub use shutdown::Shutdown;
