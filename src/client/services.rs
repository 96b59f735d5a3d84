//! Typed endpoints of the remote origin contract.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::session::{initials, AuthSession, UserRole};
use crate::client::api::{ApiClient, ClientError, RequestOptions};

/// User record as returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendUser {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Upper-case role string (STUDENT, TEACHER, ADMIN).
    pub role: String,
    pub department: String,
    #[serde(default)]
    pub semester: Option<u32>,
}

impl BackendUser {
    /// Map the origin's record into a UI-facing session.
    pub fn into_session(self) -> AuthSession {
        let avatar = initials(&self.name);
        let role = UserRole::from_backend(&self.role);
        AuthSession {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            department: self.department,
            avatar,
            semester: self.semester,
        }
    }
}

/// `POST /auth/login` with `{ email, password }`.
pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<BackendUser, ClientError> {
    client
        .request(
            "/auth/login",
            RequestOptions::post_json(json!({ "email": email, "password": password })),
        )
        .await
}

/// Link or video metadata for `POST /admin/material`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    pub subject_id: String,
    pub title: String,
    pub url: String,
    pub material_type: String,
}

/// `POST /admin/material`.
pub async fn add_material(
    client: &ApiClient,
    material: &MaterialRequest,
) -> Result<serde_json::Value, ClientError> {
    client
        .request(
            "/admin/material",
            RequestOptions::post_json(serde_json::to_value(material)?),
        )
        .await
}

/// `POST /admin/upload` with a multipart PDF payload.
pub async fn upload_material(
    client: &ApiClient,
    form: reqwest::multipart::Form,
) -> Result<serde_json::Value, ClientError> {
    client
        .request("/admin/upload", RequestOptions::multipart(form))
        .await
}

/// Response of `POST /ai/explain`; the origin has used all three field
/// names at different times.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiExplainResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl AiExplainResponse {
    /// First populated answer field.
    pub fn text(self) -> Option<String> {
        self.answer.or(self.explanation).or(self.response)
    }
}

/// `POST /ai/explain` with `{ subjectId, question }`.
pub async fn ai_explain(
    client: &ApiClient,
    subject_id: &str,
    question: &str,
) -> Result<AiExplainResponse, ClientError> {
    client
        .request(
            "/ai/explain",
            RequestOptions::post_json(json!({ "subjectId": subject_id, "question": question })),
        )
        .await
}
