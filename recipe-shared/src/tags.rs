/// Tag operations
///
/// Tags are scoped to their owner: listing only ever returns the caller's
/// own tags.

use tracing::debug;
use uuid::Uuid;

use crate::db::TagRepository;
use crate::error::DomainError;
use crate::models::tag::{CreateTag, Tag};

/// Longest accepted tag name, in characters
pub const TAG_NAME_MAX_LENGTH: usize = 255;

/// Lists tags owned by `user_id`, ordered by name
pub async fn list_owned_tags<S>(store: &S, user_id: Uuid) -> Result<Vec<Tag>, DomainError>
where
    S: TagRepository + ?Sized,
{
    let tags = store.list_tags_by_user(user_id).await?;
    debug!(%user_id, count = tags.len(), "Listed tags");
    Ok(tags)
}

/// Creates a tag owned by `user_id`
///
/// The name is trimmed and must be non-empty and at most
/// [`TAG_NAME_MAX_LENGTH`] characters.
pub async fn create_tag<S>(store: &S, user_id: Uuid, name: &str) -> Result<Tag, DomainError>
where
    S: TagRepository + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::invalid_field("name", "This field may not be blank."));
    }
    if name.chars().count() > TAG_NAME_MAX_LENGTH {
        return Err(DomainError::invalid_field(
            "name",
            format!("Ensure this field has no more than {} characters.", TAG_NAME_MAX_LENGTH),
        ));
    }

    let tag = store
        .insert_tag(CreateTag {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
        })
        .await?;

    Ok(tag)
}
