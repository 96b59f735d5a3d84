//! Session types and the single-slot session holder.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Closed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Faculty,
    Admin,
}

impl UserRole {
    /// Map the origin's upper-case role strings. TEACHER maps to faculty;
    /// anything unrecognized falls back to student.
    pub fn from_backend(role: &str) -> Self {
        match role.to_ascii_uppercase().as_str() {
            "TEACHER" | "FACULTY" => UserRole::Faculty,
            "ADMIN" => UserRole::Admin,
            _ => UserRole::Student,
        }
    }
}

/// Result of a successful login. Lives only in memory for the duration of
/// the client session; no token, no persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department: String,
    /// Avatar initials derived from the display name.
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,
}

/// Avatar initials: first letter of each whitespace-separated name token,
/// uppercased, truncated to two characters.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// One session slot plus a monotonically increasing attempt token.
///
/// Each login attempt takes a fresh token; a new attempt invalidates every
/// prior one, so a late-resolving stale attempt can no longer overwrite a
/// newer session. The slot is overwritten in full, never field by field.
#[derive(Debug, Default)]
pub struct SessionHolder {
    current: Mutex<Option<AuthSession>>,
    attempt: AtomicU64,
}

impl SessionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt, invalidating any prior in-flight attempt.
    pub fn begin_attempt(&self) -> u64 {
        self.attempt.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install the session if `token` still belongs to the newest attempt.
    /// Returns false (and leaves the slot untouched) for stale tokens.
    pub fn install(&self, token: u64, session: AuthSession) -> bool {
        if self.attempt.load(Ordering::SeqCst) != token {
            return false;
        }
        *self.lock() = Some(session);
        true
    }

    /// Clone of the active session, if any.
    pub fn snapshot(&self) -> Option<AuthSession> {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AuthSession>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
