use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full user row as stored. Never serialized back to clients whole; the
/// password hash and reset-code fields stay inside the domain layer.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reset_code: Option<String>,
    #[serde(default)]
    pub reset_code_expires: Option<DateTime<Utc>>,
}

/// Client-facing user projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}
