/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, token issuance, and profile endpoints
/// - `tags`: Recipe tag listing

pub mod health;
pub mod tags;
pub mod users;
