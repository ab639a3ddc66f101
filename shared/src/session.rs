use crate::processing::lenient;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A user as reported by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[display(fmt = "{}", username)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Body of `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionProbe {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

fn default_ok() -> bool {
    true
}

impl SessionProbe {
    /// An explicit `ok: false` or a missing user both mean "no session".
    pub fn into_user(self) -> Option<SessionUser> {
        if self.ok { self.user } else { None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginCredentials {
    pub identifier: String,
    pub password: String,
    pub remember: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupCredentials {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Successful login/register body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error payload shared by every endpoint: `{ error }` or `{ message }`.
/// Fields that are not strings are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
