use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::todo::now;

/// Stored account. Never serialized: the hash must not leave the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: now(),
        }
    }
}
