/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the length policy
/// - [`token`]: Opaque token generation and SHA-256 digests
/// - [`middleware`]: Axum middleware resolving `Authorization: Token ...`
///
/// # Example
///
/// ```
/// use recipe_shared::auth::password::{hash_password, verify_password};
/// use recipe_shared::auth::token::{generate_token, hash_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let (token, digest) = generate_token();
/// assert_eq!(hash_token(&token), digest);
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod token;
