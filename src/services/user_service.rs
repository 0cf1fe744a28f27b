// Profile reads, updates and cascading account deletion
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::api::document_without;
use crate::api::format::USER_PROFILE_HIDDEN;
use crate::database::store::{Collection, DocumentStore};
use crate::error::ApiError;
use crate::filter::{Filter, FindQuery};
use crate::middleware::AuthUser;
use crate::models::{to_body, User, UserUpdate};
use crate::storage::ObjectStorage;
use crate::types::SpaceCategory;

use super::auth_service::{hash_in_background, roles_of};
use super::image_service;

pub async fn get(store: &dyn DocumentStore, requester: &AuthUser, id: Uuid) -> Result<Value, ApiError> {
    requester.ensure_can_manage(Some(id))?;
    let user = store.get(Collection::Users, id, "User").await?;
    Ok(document_without(&user, &USER_PROFILE_HIDDEN))
}

/// Partial profile update. A new password is hashed; roles cannot change here.
pub async fn update(store: &dyn DocumentStore, requester: &AuthUser, id: Uuid, mut changes: UserUpdate) -> Result<Value, ApiError> {
    changes.validate()?;
    requester.ensure_can_manage(Some(id))?;

    let existing = store.get(Collection::Users, id, "User").await?;
    let mut user: User = serde_json::from_value(Value::Object(existing.body))
        .map_err(|e| ApiError::internal("Stored user does not decode", e))?;

    if let Some(password) = changes.password.take() {
        user.password = hash_in_background(password).await?;
    }
    changes.apply(&mut user);
    user.validate()?;

    let updated = store
        .replace(Collection::Users, id, to_body(&user)?)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(document_without(&updated, &USER_PROFILE_HIDDEN))
}

/// Delete an account together with its address and every listing it owns.
/// Admin accounts are never deleted through this path.
pub async fn delete(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    requester: &AuthUser,
    id: Uuid,
) -> Result<Value, ApiError> {
    let target = store.get(Collection::Users, id, "User").await?;
    if roles_of(&target).iter().any(|role| role.is_admin()) {
        return Err(ApiError::forbidden("Admins cannot be deleted"));
    }
    requester.ensure_can_manage(Some(id))?;

    let owned = Filter::new().eq("userId", id.to_string());
    for category in SpaceCategory::ALL {
        let collection = category.collection();
        let listings = store.find(collection, &FindQuery::new(owned.clone())).await?;
        let urls: Vec<String> = listings.iter().flat_map(|doc| doc.image_urls()).collect();
        image_service::cleanup_images(storage, &urls).await;
        let removed = store.delete_many(collection, &owned).await?;
        if removed > 0 {
            tracing::info!("Removed {} {} owned by user {}", removed, category.plural(), id);
        }
    }
    store.delete_many(Collection::Addresses, &owned).await?;

    let deleted = store
        .delete_by_id(Collection::Users, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    tracing::info!("Deleted user {}", id);
    Ok(document_without(&deleted, &USER_PROFILE_HIDDEN))
}
