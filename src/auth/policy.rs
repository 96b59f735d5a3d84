//! Retry/fallback login flow.
//!
//! Models recovery from a cold-starting origin plus graceful degradation to
//! the local account directory. No error escapes this layer; every terminal
//! state is a plain [`LoginOutcome`] value.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::accounts::AccountDirectory;
use crate::auth::session::{initials, AuthSession, SessionHolder, UserRole};
use crate::client::api::{ApiClient, ClientError};
use crate::client::services;
use crate::config::AuthRetryConfig;

/// Terminal result of a login or signup attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// The login state machine, layered above the resilient client.
pub struct LoginFlow<D> {
    client: Arc<ApiClient>,
    directory: D,
    sessions: Arc<SessionHolder>,
    retry: AuthRetryConfig,
}

impl<D: AccountDirectory> LoginFlow<D> {
    pub fn new(
        client: Arc<ApiClient>,
        directory: D,
        sessions: Arc<SessionHolder>,
        retry: AuthRetryConfig,
    ) -> Self {
        Self {
            client,
            directory,
            sessions,
            retry,
        }
    }

    /// Attempt a login against the origin, retrying while it warms up, then
    /// fall back to the local directory.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let token = self.sessions.begin_attempt();

        match self.try_backend(email, password).await {
            Ok(session) => {
                if !self.sessions.install(token, session) {
                    tracing::debug!(email, "login result discarded, superseded by a newer attempt");
                }
                LoginOutcome::ok()
            }
            Err(err) => {
                tracing::warn!(error = %err, email, "backend login failed, trying local fallback");
                self.fallback(email, password, err, token)
            }
        }
    }

    async fn try_backend(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let mut retries = self.retry.max_retries;
        loop {
            match services::login(&self.client, email, password).await {
                Ok(user) => return Ok(user.into_session()),
                // 502/503 means the relay is up but the origin is still waking.
                Err(err) if err.is_cold_start() && retries > 0 => {
                    retries -= 1;
                    tracing::info!(
                        remaining = retries,
                        delay_ms = self.retry.backoff_ms,
                        "origin warming up, retrying login"
                    );
                    tokio::time::sleep(Duration::from_millis(self.retry.backoff_ms)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn fallback(
        &self,
        email: &str,
        password: &str,
        backend_err: ClientError,
        token: u64,
    ) -> LoginOutcome {
        let Some(account) = self.directory.lookup(email) else {
            // No local account either; surface the origin's own message
            // when it produced one.
            let error = match backend_err {
                ClientError::Api { message, .. } if !message.is_empty() => message,
                _ => "Backend is offline and no account found for this email.".to_string(),
            };
            return LoginOutcome::failed(error);
        };

        if account.password != password {
            // Unlike the remote path, this does reveal the account exists.
            return LoginOutcome::failed("Incorrect password");
        }

        if !self.sessions.install(token, account.to_session()) {
            tracing::debug!(email, "fallback result discarded, superseded by a newer attempt");
        }
        LoginOutcome::ok()
    }

    /// Local signup. The origin has no registration endpoint yet, so the
    /// account is constructed synchronously on this side.
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        _password: &str,
        role: UserRole,
        department: &str,
    ) -> LoginOutcome {
        let token = self.sessions.begin_attempt();
        let session = AuthSession {
            id: format!("u_{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            email: email.to_lowercase(),
            role,
            department: department.to_string(),
            avatar: initials(name),
            semester: None,
        };
        self.sessions.install(token, session);
        LoginOutcome::ok()
    }

    pub fn logout(&self) {
        self.sessions.clear();
    }

    pub fn sessions(&self) -> &SessionHolder {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::accounts::StaticDirectory;
    use url::Url;

    fn flow() -> LoginFlow<StaticDirectory> {
        let client = Arc::new(
            ApiClient::new(Url::parse("http://127.0.0.1:1").unwrap()).unwrap(),
        );
        LoginFlow::new(
            client,
            StaticDirectory::demo(),
            Arc::new(SessionHolder::new()),
            AuthRetryConfig::default(),
        )
    }

    #[test]
    fn signup_builds_a_local_session() {
        let flow = flow();
        let outcome = flow.signup(
            "Ada Lovelace Byron",
            "Ada@Example.Com",
            "pw",
            UserRole::Student,
            "Mathematics",
        );
        assert!(outcome.success);

        let session = flow.sessions().snapshot().unwrap();
        assert!(session.id.starts_with("u_"));
        assert_eq!(session.avatar, "AL");
        assert_eq!(session.email, "ada@example.com");
        assert_eq!(session.semester, None);
    }

    #[test]
    fn logout_clears_the_session() {
        let flow = flow();
        flow.signup("John Doe", "j@d.com", "pw", UserRole::Admin, "CS");
        assert!(flow.sessions().is_authenticated());

        flow.logout();
        assert!(!flow.sessions().is_authenticated());
    }
}
