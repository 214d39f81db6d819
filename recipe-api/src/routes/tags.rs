/// Recipe tag endpoints
///
/// Only listing is exposed. Tags are always filtered to the caller.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use recipe_shared::{auth::middleware::AuthContext, models::tag::Tag, tags};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// List the caller's tags
///
/// ```text
/// GET /api/recipe/tags/
/// Authorization: Token <key>
/// ```
///
/// Returns `[{ "id": "...", "name": "Dessert" }, ...]` ordered by name.
pub async fn list_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TagResponse>>> {
    let tags = tags::list_owned_tags(state.store.as_ref(), auth.user_id()).await?;

    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}
