/// Auth token model
///
/// One row per issued token. Only the SHA-256 digest is stored; the
/// plaintext token is handed to the client once, at issuance.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE auth_tokens (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stored token record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,

    /// SHA-256 hex digest of the token
    #[serde(skip_serializing)]
    pub token_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Input for storing a freshly issued token
#[derive(Debug, Clone)]
pub struct CreateAuthToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
}
