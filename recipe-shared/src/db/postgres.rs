/// PostgreSQL store adapter
///
/// Implements the repository ports with runtime-checked sqlx queries, so
/// building the crate needs no live database.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, TagRepository, TokenRepository, UserRepository};
use crate::models::{
    auth_token::{AuthToken, CreateAuthToken},
    tag::{CreateTag, Tag},
    user::{CreateUser, UpdateUser, User},
};

const USER_COLUMNS: &str = "id, email, name, password_hash, is_active, is_staff, is_superuser, \
                            created_at, updated_at, last_login_at";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, name, is_active, is_staff, is_superuser) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.id)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.name)
            .bind(data.is_active)
            .bind(data.is_staff)
            .bind(data.is_superuser)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        // NULL binds leave the column untouched
        let query = format!(
            "UPDATE users SET \
                 email = COALESCE($2, email), \
                 password_hash = COALESCE($3, password_hash), \
                 name = COALESCE($4, name), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TagRepository for PgStore {
    async fn insert_tag(&self, data: CreateTag) -> Result<Tag, StoreError> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, user_id, name)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn list_tags_by_user(&self, user_id: Uuid) -> Result<Vec<Tag>, StoreError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE user_id = $1
            ORDER BY name ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }
}

#[async_trait]
impl TokenRepository for PgStore {
    async fn insert_token(&self, data: CreateAuthToken) -> Result<AuthToken, StoreError> {
        let token = sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (id, user_id, token_hash)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, created_at
            "#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.token_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }

    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.is_active, u.is_staff,
                   u.is_superuser, u.created_at, u.updated_at, u.last_login_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        super::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
