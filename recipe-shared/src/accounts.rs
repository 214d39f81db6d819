/// Account management
///
/// The [`UserManager`] is the only way user rows get created: it enforces
/// the email requirement, normalizes the address, and hashes the password.
/// The free functions below are what the HTTP handlers call, one per
/// operation.
///
/// # Example
///
/// ```
/// use recipe_shared::accounts::{issue_token, UserManager};
/// use recipe_shared::db::memory::MemoryStore;
/// use recipe_shared::models::user::NewUserFields;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = UserManager::new(&store)
///     .create_user(Some("test@GMAIL.COM"), "testpass", NewUserFields::default())
///     .await?;
/// assert_eq!(user.email, "test@gmail.com");
///
/// let issued = issue_token(&store, "test@gmail.com", "testpass").await?;
/// assert_eq!(issued.token.len(), 40);
/// # Ok(())
/// # }
/// ```

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::{password, token};
use crate::db::{StoreError, TokenRepository, UserRepository};
use crate::error::DomainError;
use crate::models::{
    auth_token::CreateAuthToken,
    user::{CreateUser, NewUserFields, UpdateUser, User},
};

/// Normalizes an email address for storage and lookup
///
/// Surrounding whitespace is trimmed and the whole address is lowercased,
/// local part included. Returns `None` when nothing is left.
///
/// ```
/// use recipe_shared::accounts::normalize_email;
///
/// assert_eq!(normalize_email("  Test@GMAIL.COM "), Some("test@gmail.com".to_string()));
/// assert_eq!(normalize_email("   "), None);
/// ```
pub fn normalize_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Factory for user records
pub struct UserManager<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R> UserManager<'a, R>
where
    R: UserRepository + ?Sized,
{
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Creates and persists a user
    ///
    /// # Errors
    ///
    /// - `MissingEmail` if `email` is `None` or blank
    /// - `EmailTaken` if the normalized email is already registered
    #[instrument(skip(self, password, extra))]
    pub async fn create_user(
        &self,
        email: Option<&str>,
        password: &str,
        extra: NewUserFields,
    ) -> Result<User, DomainError> {
        let email = email
            .and_then(normalize_email)
            .ok_or(DomainError::MissingEmail)?;

        let password_hash = password::hash_password(password)?;

        let user = self
            .repo
            .insert_user(CreateUser {
                id: Uuid::new_v4(),
                email: email.clone(),
                password_hash,
                name: extra.name,
                is_active: extra.is_active,
                is_staff: extra.is_staff,
                is_superuser: extra.is_superuser,
            })
            .await
            .map_err(|e| email_conflict(e, &email))?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Creates a user with the staff and superuser flags set
    pub async fn create_superuser(&self, email: &str, password: &str) -> Result<User, DomainError> {
        self.create_user(
            Some(email),
            password,
            NewUserFields {
                is_staff: true,
                is_superuser: true,
                ..Default::default()
            },
        )
        .await
    }
}

fn email_conflict(err: StoreError, email: &str) -> DomainError {
    if err.is_duplicate_email() {
        DomainError::EmailTaken {
            email: email.to_string(),
        }
    } else {
        DomainError::Store(err)
    }
}

/// Registration input
#[derive(Debug, Clone, Default)]
pub struct RegisterUser {
    pub email: Option<String>,
    pub password: String,
    pub name: String,
}

/// Registers a new account
///
/// Applies the password length policy and rejects emails already in use
/// before handing off to the [`UserManager`].
pub async fn register_user<S>(store: &S, input: RegisterUser) -> Result<User, DomainError>
where
    S: UserRepository + ?Sized,
{
    password::validate_password_length(&input.password)
        .map_err(|message| DomainError::invalid_field("password", message))?;

    if let Some(email) = input.email.as_deref().and_then(normalize_email) {
        if store.find_user_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailTaken { email });
        }
    }

    UserManager::new(store)
        .create_user(
            input.email.as_deref(),
            &input.password,
            NewUserFields::named(input.name),
        )
        .await
}

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Plaintext token, shown to the client once
    pub token: String,
    pub user_id: Uuid,
}

/// Checks credentials and issues a new opaque token
///
/// # Errors
///
/// - `MissingCredentials` if either field is blank
/// - `InvalidCredentials` for an unknown email, wrong password, or an
///   inactive account; the three cases are indistinguishable to the caller
#[instrument(skip(store, password))]
pub async fn issue_token<S>(store: &S, email: &str, password: &str) -> Result<IssuedToken, DomainError>
where
    S: UserRepository + TokenRepository + ?Sized,
{
    let email = normalize_email(email).ok_or(DomainError::MissingCredentials)?;
    if password.is_empty() {
        return Err(DomainError::MissingCredentials);
    }

    let user = match store.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            warn!("Token requested for unknown email");
            return Err(DomainError::InvalidCredentials);
        }
    };

    if !user.is_active || !user.check_password(password)? {
        warn!(user_id = %user.id, "Token request rejected");
        return Err(DomainError::InvalidCredentials);
    }

    let (plaintext, token_hash) = token::generate_token();
    store
        .insert_token(CreateAuthToken {
            id: Uuid::new_v4(),
            user_id: user.id,
            token_hash,
        })
        .await?;
    store.touch_last_login(user.id).await?;

    info!(user_id = %user.id, "Token issued");
    Ok(IssuedToken {
        token: plaintext,
        user_id: user.id,
    })
}

/// Resolves a presented token to its active owner
pub async fn authenticate_token<S>(store: &S, presented: &str) -> Result<User, DomainError>
where
    S: TokenRepository + ?Sized,
{
    if !token::validate_token_format(presented) {
        return Err(DomainError::InvalidToken);
    }

    let user = store
        .find_user_by_token_hash(&token::hash_token(presented))
        .await?
        .ok_or(DomainError::InvalidToken)?;

    if !user.is_active {
        return Err(DomainError::InvalidToken);
    }

    Ok(user)
}

/// Partial profile update; `None` fields are left alone
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Updates the caller's own profile
///
/// A new password goes through the length policy and is re-hashed; a new
/// email is normalized and must not belong to another account.
#[instrument(skip(store, update))]
pub async fn update_profile<S>(
    store: &S,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<User, DomainError>
where
    S: UserRepository + ?Sized,
{
    let email = match update.email {
        Some(raw) => Some(normalize_email(&raw).ok_or(DomainError::MissingEmail)?),
        None => None,
    };

    let password_hash = match update.password {
        Some(new_password) => {
            password::validate_password_length(&new_password)
                .map_err(|message| DomainError::invalid_field("password", message))?;
            Some(password::hash_password(&new_password)?)
        }
        None => None,
    };

    let changes = UpdateUser {
        email: email.clone(),
        password_hash,
        name: update.name,
    };

    if changes.is_empty() {
        return store
            .find_user_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound { id: user_id });
    }

    let user = store
        .update_user(user_id, changes)
        .await
        .map_err(|e| email_conflict(e, email.as_deref().unwrap_or_default()))?
        .ok_or(DomainError::UserNotFound { id: user_id })?;

    info!("Profile updated");
    Ok(user)
}
