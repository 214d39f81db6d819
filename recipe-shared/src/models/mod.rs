/// Data models
///
/// Plain records shared by the repository ports in [`crate::db`] and the
/// domain functions in [`crate::accounts`] and [`crate::tags`].
///
/// # Models
///
/// - `user`: User accounts
/// - `tag`: Recipe tags owned by a user
/// - `auth_token`: Issued authentication tokens (digest only)

pub mod auth_token;
pub mod tag;
pub mod user;
