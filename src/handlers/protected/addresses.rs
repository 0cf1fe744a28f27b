// handlers/protected/addresses.rs - /api/v1/addresses

use axum::extract::State;
use serde_json::Value;

use crate::api::document_to_api_value;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, JsonBody};
use crate::services::address_service;

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<Value>,
) -> ApiResult<Value> {
    let address = address_service::create(state.store.as_ref(), &user, payload).await?;
    Ok(ApiResponse::created("Address created successfully", document_to_api_value(&address)))
}

pub async fn show(State(state): State<AppState>, user: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    let address = address_service::get(state.store.as_ref(), &user, id).await?;
    Ok(ApiResponse::success("Address found successfully", document_to_api_value(&address)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<Value>,
) -> ApiResult<Value> {
    let address = address_service::update(state.store.as_ref(), &user, id, patch).await?;
    Ok(ApiResponse::success("Address updated successfully", document_to_api_value(&address)))
}

pub async fn delete(State(state): State<AppState>, user: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    let address = address_service::delete(state.store.as_ref(), &user, id).await?;
    Ok(ApiResponse::success("Address deleted successfully", document_to_api_value(&address)))
}
