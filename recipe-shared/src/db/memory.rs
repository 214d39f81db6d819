/// In-process store adapter
///
/// Keeps every table behind one `RwLock`, so a uniqueness check and the
/// write that follows it are atomic. Used by the test suites and handy for
/// running the API without PostgreSQL.
///
/// # Example
///
/// ```
/// use recipe_shared::db::{memory::MemoryStore, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// assert!(store.find_user_by_email("nobody@example.com").await?.is_none());
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Store, StoreError, TagRepository, TokenRepository, UserRepository,
    AUTH_TOKENS_HASH_CONSTRAINT, USERS_EMAIL_CONSTRAINT,
};
use crate::models::{
    auth_token::{AuthToken, CreateAuthToken},
    tag::{CreateTag, Tag},
    user::{CreateUser, UpdateUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    tags: Vec<Tag>,
    /// Keyed by token digest
    tokens: HashMap<String, AuthToken>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Store holding everything in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(constraint: &str) -> StoreError {
    StoreError::Duplicate {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(&data.email, None) {
            return Err(duplicate(USERS_EMAIL_CONSTRAINT));
        }

        let now = Utc::now();
        let user = User {
            id: data.id,
            email: data.email,
            name: data.name,
            password_hash: data.password_hash,
            is_active: data.is_active,
            is_staff: data.is_staff,
            is_superuser: data.is_superuser,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(ref email) = data.email {
            if tables.email_taken(email, Some(id)) {
                return Err(duplicate(USERS_EMAIL_CONSTRAINT));
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = data.email {
            user.email = email;
        }
        if let Some(password_hash) = data.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(name) = data.name {
            user.name = name;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        match tables.users.get_mut(&id) {
            Some(user) => {
                user.last_login_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn insert_tag(&self, data: CreateTag) -> Result<Tag, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.user_id) {
            return Err(StoreError::Database(format!(
                "tag owner {} does not exist",
                data.user_id
            )));
        }

        let tag = Tag {
            id: data.id,
            user_id: data.user_id,
            name: data.name,
            created_at: Utc::now(),
        };
        tables.tags.push(tag.clone());

        Ok(tag)
    }

    async fn list_tags_by_user(&self, user_id: Uuid) -> Result<Vec<Tag>, StoreError> {
        let tables = self.tables.read().await;

        let mut tags: Vec<Tag> = tables
            .tags
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));

        Ok(tags)
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn insert_token(&self, data: CreateAuthToken) -> Result<AuthToken, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.tokens.contains_key(&data.token_hash) {
            return Err(duplicate(AUTH_TOKENS_HASH_CONSTRAINT));
        }
        if !tables.users.contains_key(&data.user_id) {
            return Err(StoreError::Database(format!(
                "token owner {} does not exist",
                data.user_id
            )));
        }

        let token = AuthToken {
            id: data.id,
            user_id: data.user_id,
            token_hash: data.token_hash,
            created_at: Utc::now(),
        };
        tables.tokens.insert(token.token_hash.clone(), token.clone());

        Ok(token)
    }

    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .tokens
            .get(token_hash)
            .and_then(|t| tables.users.get(&t.user_id))
            .cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
