//! Authentication subsystem.
//!
//! # States
//! ```text
//! Attempting(n) ── 2xx ──────────────▶ Authenticated
//!      │
//!      ├─ 502/503, n > 0: fixed backoff, Attempting(n-1)
//!      │
//!      └─ other error, or budget exhausted
//!                 │
//!                 ▼
//!          FallbackLookup ── local match ───▶ Authenticated
//!                 │
//!                 ├─ no local account: failure with origin message
//!                 └─ wrong password:   failure, "Incorrect password"
//! ```
//!
//! # Design Decisions
//! - Fixed backoff, not exponential: cold-start duration is roughly
//!   constant and bounded (~30s worst case across all attempts)
//! - One session slot, overwritten in full; an attempt token invalidates
//!   stale in-flight logins so they cannot clobber a newer session
//! - Signup never contacts the origin; no registration endpoint exists

pub mod accounts;
pub mod policy;
pub mod session;

pub use accounts::{AccountDirectory, LocalAccount, StaticDirectory};
pub use policy::{LoginFlow, LoginOutcome};
pub use session::{AuthSession, SessionHolder, UserRole};
