/// Persistence layer
///
/// Domain code never talks to sqlx directly. It depends on the repository
/// ports declared here, bundled as [`Store`], and receives one of two
/// adapters:
///
/// - [`postgres::PgStore`]: PostgreSQL via a sqlx pool (production)
/// - [`memory::MemoryStore`]: in-process tables (tests, local runs)
///
/// Connection pooling and migrations live in [`pool`] and [`migrations`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use recipe_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
/// use recipe_shared::db::{postgres::PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
/// run_migrations(&pool).await?;
///
/// let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    auth_token::{AuthToken, CreateAuthToken},
    tag::{CreateTag, Tag},
    user::{CreateUser, UpdateUser, User},
};

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;

/// Unique constraint on `users.email`
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Unique constraint on `auth_tokens.token_hash`
pub const AUTH_TOKENS_HASH_CONSTRAINT: &str = "auth_tokens_token_hash_key";

/// Error type shared by all store adapters
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Duplicate value violates unique constraint '{constraint}'")]
    Duplicate { constraint: String },

    /// Any other backend failure
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, StoreError::Duplicate { constraint } if constraint == USERS_EMAIL_CONSTRAINT)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err.to_string())
    }
}

/// Persistence operations on users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a fully-formed user. Fails with `Duplicate` on a taken email.
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Exact match on the stored (normalized) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Applies the `Some` fields of `data`. Returns `None` if the user is gone.
    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError>;

    /// Sets `last_login_at` to now. Returns false if the user is gone.
    async fn touch_last_login(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Persistence operations on tags
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn insert_tag(&self, data: CreateTag) -> Result<Tag, StoreError>;

    /// Tags owned by `user_id`, ordered by name
    async fn list_tags_by_user(&self, user_id: Uuid) -> Result<Vec<Tag>, StoreError>;
}

/// Persistence operations on auth tokens
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn insert_token(&self, data: CreateAuthToken) -> Result<AuthToken, StoreError>;

    /// Resolves a token digest to its owner
    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, StoreError>;
}

/// Everything the domain needs from persistence
#[async_trait]
pub trait Store: UserRepository + TagRepository + TokenRepository {
    /// Cheap liveness probe used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}
