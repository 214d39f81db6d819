/// Opaque authentication token utilities
///
/// Tokens are 40 lowercase hex characters (20 random bytes). Clients present
/// them in the `Authorization` header; the server only keeps the SHA-256
/// digest, so a leaked database does not leak usable credentials.
///
/// # Example
///
/// ```
/// use recipe_shared::auth::token::{generate_token, hash_token, validate_token_format};
///
/// let (token, hash) = generate_token();
/// assert_eq!(token.len(), 40);
/// assert!(validate_token_format(&token));
/// assert_eq!(hash, hash_token(&token));
/// ```

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes behind a token
const TOKEN_BYTES: usize = 20;

/// Length of a token string (hex encoded)
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Generates a new token
///
/// Returns `(plaintext_token, sha256_hex)`. The plaintext goes to the client
/// exactly once; the digest goes to storage.
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    let token = hex::encode(bytes);
    let hash = hash_token(&token);

    (token, hash)
}

/// Hashes a token using SHA-256, hex encoded (64 characters)
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks that a token has the issued shape: 40 lowercase hex characters
///
/// Used to reject garbage before touching the store.
pub fn validate_token_format(token: &str) -> bool {
    token.len() == TOKEN_LENGTH
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let (token, hash) = generate_token();

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert_eq!(hash.len(), 64);
        assert!(validate_token_format(&token));
    }

    #[test]
    fn test_generate_token_unique() {
        let (token1, hash1) = generate_token();
        let (token2, hash2) = generate_token();

        assert_ne!(token1, token2);
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_token_deterministic() {
        let token = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";
        assert_eq!(hash_token(token), hash_token(token));
        assert_ne!(hash_token(token), token);
    }

    #[test]
    fn test_validate_token_format_rejects_bad_input() {
        assert!(validate_token_format("9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b"));

        // Too short
        assert!(!validate_token_format("9944b091"));
        // Uppercase hex
        assert!(!validate_token_format("9944B09199C62BCF9418AD846DD0E4BBDFC6EE4B"));
        // Non-hex character
        assert!(!validate_token_format("9944b09199c62bcf9418ad846dd0e4bbdfc6ee4z"));
        assert!(!validate_token_format(""));
    }
}
