/// Domain error type
///
/// Returned by every function in [`crate::accounts`] and [`crate::tags`].
/// The HTTP layer decides status codes; this type only says what went wrong.

use uuid::Uuid;

use crate::auth::password::PasswordError;
use crate::db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Creation or update without an email address
    #[error("Users must have an email address")]
    MissingEmail,

    /// Another account already uses this email
    #[error("A user with email '{email}' already exists")]
    EmailTaken { email: String },

    /// A field failed a domain rule
    #[error("Invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    /// Token request without both email and password
    #[error("Must include \"email\" and \"password\"")]
    MissingCredentials,

    /// Wrong password, unknown email, or inactive account
    #[error("Unable to authenticate with provided credentials")]
    InvalidCredentials,

    /// Token malformed, unknown, or owned by an inactive account
    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by caller input rather than the system
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingEmail
                | Self::EmailTaken { .. }
                | Self::InvalidField { .. }
                | Self::MissingCredentials
                | Self::InvalidCredentials
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::MissingEmail.to_string(),
            "Users must have an email address"
        );
        assert_eq!(
            DomainError::invalid_field("password", "too short").to_string(),
            "Invalid password: too short"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(DomainError::MissingEmail.is_validation());
        assert!(DomainError::InvalidCredentials.is_validation());
        assert!(!DomainError::InvalidToken.is_validation());
        assert!(!DomainError::Store(StoreError::Database("down".to_string())).is_validation());
    }
}
