//! # Recipe Shared Library
//!
//! Domain logic and persistence for the recipe API: the user manager,
//! account and tag operations, token authentication, and the store ports
//! with their PostgreSQL and in-memory adapters.
//!
//! ## Module Organization
//!
//! - `accounts`: User manager, registration, tokens, profile updates
//! - `tags`: Owner-scoped tag operations
//! - `auth`: Password hashing, token utilities, Axum middleware
//! - `db`: Repository ports, store adapters, pool and migrations
//! - `models`: Plain records for users, tags, and tokens
//! - `error`: Domain error type

pub mod accounts;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod tags;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
