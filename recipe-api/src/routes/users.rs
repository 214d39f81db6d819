/// User account endpoints
///
/// # Endpoints
///
/// - `POST /api/user/create/` - Register a new user
/// - `POST /api/user/token/` - Exchange credentials for a token
/// - `GET /api/user/me/` - Read own profile
/// - `PATCH /api/user/me/` - Update own profile

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use recipe_shared::{
    accounts::{self, ProfileUpdate, RegisterUser},
    auth::middleware::AuthContext,
    models::user::User,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request
///
/// A missing email falls through to the account manager, which reports it
/// as a required field.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub email: Option<String>,

    /// Length policy is enforced by the account layer
    #[serde(default)]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub name: String,
}

/// Public view of a user; never carries the password
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

/// Token request
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Partial profile update; absent fields are unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub name: Option<String>,

    pub password: Option<String>,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/user/create/
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "testpass", "name": "Test Name" }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "email": "user@example.com", "name": "Test Name" }`
///
/// # Errors
///
/// - `400 Bad Request`: invalid input, email already registered, or
///   password shorter than five characters
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let user = accounts::register_user(
        state.store.as_ref(),
        RegisterUser {
            email: req.email,
            password: req.password,
            name: req.name,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Issue an auth token
///
/// # Endpoint
///
/// ```text
/// POST /api/user/token/
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "testpass" }
/// ```
///
/// # Response
///
/// `200 OK` with `{ "token": "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b" }`
///
/// # Errors
///
/// - `400 Bad Request`: missing fields or credentials that do not
///   authenticate; the body never contains a `token` key
pub async fn create_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload?;

    let issued = accounts::issue_token(state.store.as_ref(), &req.email, &req.password).await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// Return the authenticated user's profile
pub async fn get_profile(Extension(auth): Extension<AuthContext>) -> Json<UserResponse> {
    Json(auth.user.into())
}

/// Update the authenticated user's profile
///
/// # Errors
///
/// - `400 Bad Request`: invalid email, taken email, or short password
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let user = accounts::update_profile(
        state.store.as_ref(),
        auth.user_id(),
        ProfileUpdate {
            email: req.email,
            name: req.name,
            password: req.password,
        },
    )
    .await?;

    Ok(Json(user.into()))
}
