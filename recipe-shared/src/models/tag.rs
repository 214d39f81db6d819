/// Tag model
///
/// A tag is a short label a user attaches to recipes. Each tag belongs to
/// exactly one user and is only ever listed back to that user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for creating a tag
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}
