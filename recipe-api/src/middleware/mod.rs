/// Middleware modules for the API server
///
/// Token authentication lives in `recipe_shared::auth::middleware`; this
/// module holds the HTTP-only concerns.

pub mod security;
