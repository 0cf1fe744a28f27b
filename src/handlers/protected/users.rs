// handlers/protected/users.rs - GET/PUT/DELETE /api/v1/users/:id (owner or admin)

use axum::extract::State;
use serde_json::Value;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, JsonBody};
use crate::models::UserUpdate;
use crate::services::user_service;

pub async fn show(State(state): State<AppState>, user: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    let profile = user_service::get(state.store.as_ref(), &user, id).await?;
    Ok(ApiResponse::success("User found successfully", profile))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
    JsonBody(changes): JsonBody<UserUpdate>,
) -> ApiResult<Value> {
    let profile = user_service::update(state.store.as_ref(), &user, id, changes).await?;
    Ok(ApiResponse::success("User updated successfully", profile))
}

/// Cascades to the user's address and listings
pub async fn delete(State(state): State<AppState>, user: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    let profile = user_service::delete(state.store.as_ref(), state.storage.as_ref(), &user, id).await?;
    Ok(ApiResponse::success("User deleted successfully", profile))
}
