//! Local fallback account directory.
//!
//! Used to authenticate when the remote origin is unreachable. The lookup
//! capability is a trait so the login flow stays testable without the fixed
//! table and can be swapped for a real store later.

use std::collections::HashMap;

use crate::auth::session::{AuthSession, UserRole};

/// A stored demo account, password included.
#[derive(Debug, Clone)]
pub struct LocalAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department: String,
    pub avatar: String,
    pub password: String,
    pub semester: Option<u32>,
}

impl LocalAccount {
    /// Session built from this record with the password stripped.
    pub fn to_session(&self) -> AuthSession {
        AuthSession {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            department: self.department.clone(),
            avatar: self.avatar.clone(),
            semester: self.semester,
        }
    }
}

/// Lookup capability injected into the login flow.
pub trait AccountDirectory: Send + Sync {
    /// Case-insensitive lookup by the submitted identifier.
    fn lookup(&self, email: &str) -> Option<LocalAccount>;
}

/// Fixed in-memory directory, reset on every restart.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    accounts: HashMap<String, LocalAccount>,
}

impl StaticDirectory {
    pub fn with_accounts(accounts: impl IntoIterator<Item = LocalAccount>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.email.to_lowercase(), account))
                .collect(),
        }
    }

    /// The seeded demo accounts.
    pub fn demo() -> Self {
        Self::with_accounts([
            account("s1", "John Doe", "student@email.com", UserRole::Student, "CS", "JD", "password", Some(3)),
            account("f1", "Prof Smith", "teacher@email.com", UserRole::Faculty, "CS", "PS", "password", None),
            account("a1", "Admin User", "admin@email.com", UserRole::Admin, "AdminDept", "AU", "password", None),
            // Legacy demo accounts kept for backward compat.
            account("s2", "Aarav Sharma", "student@edu.in", UserRole::Student, "Computer Science", "AS", "student123", Some(3)),
            account("f2", "Dr. Priya Nair", "faculty@edu.in", UserRole::Faculty, "Electrical Engineering", "PN", "faculty123", None),
            account("a2", "Rajesh Kumar", "admin@edu.in", UserRole::Admin, "Administration", "RK", "admin123", None),
        ])
    }
}

impl AccountDirectory for StaticDirectory {
    fn lookup(&self, email: &str) -> Option<LocalAccount> {
        self.accounts.get(&email.to_lowercase()).cloned()
    }
}

#[allow(clippy::too_many_arguments)]
fn account(
    id: &str,
    name: &str,
    email: &str,
    role: UserRole,
    department: &str,
    avatar: &str,
    password: &str,
    semester: Option<u32>,
) -> LocalAccount {
    LocalAccount {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        department: department.to_string(),
        avatar: avatar.to_string(),
        password: password.to_string(),
        semester,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let directory = StaticDirectory::demo();
        let found = directory.lookup("Student@Email.Com").unwrap();
        assert_eq!(found.id, "s1");
        assert!(directory.lookup("nobody@email.com").is_none());
    }

    #[test]
    fn sessions_never_carry_the_password() {
        let directory = StaticDirectory::demo();
        let account = directory.lookup("faculty@edu.in").unwrap();
        let session = account.to_session();

        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["avatar"], "PN");
    }
}
