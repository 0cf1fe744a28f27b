// handlers/protected/listings.rs - Owner-side listing endpoints
//
//   POST   /api/v1/{kind}                  create
//   GET    /api/v1/{kind}/my-{kind}        requester's own listings
//   POST   /api/v1/{kind}/get-signed-url   photo upload credentials
//   PUT    /api/v1/{kind}/:id              owner or admin
//   DELETE /api/v1/{kind}/:id              owner or admin

use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{document_to_api_value, Page};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, JsonBody, QueryParams};
use crate::models::Listing;
use crate::services::image_service::{self, FileDescriptor, UploadBatch};
use crate::services::listing_service::{self, PageQuery};

pub async fn create<M: Listing>(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<Value>,
) -> ApiResult<Value> {
    let document = listing_service::create::<M>(state.store.as_ref(), user.user_id, payload).await?;
    Ok(ApiResponse::created(
        format!("{} created successfully", M::ENTITY),
        document_to_api_value(&document),
    ))
}

pub async fn mine<M: Listing>(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<Page<Value>> {
    let page =
        listing_service::list_owned::<M>(state.store.as_ref(), user.user_id, &query, state.config.api.max_page_size)
            .await?;
    Ok(ApiResponse::success(
        format!("Found my {} successfully", M::CATEGORY.plural()),
        page.map(|doc| document_to_api_value(&doc)),
    ))
}

pub async fn update<M: Listing>(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<Value>,
) -> ApiResult<Value> {
    let document = listing_service::update::<M>(state.store.as_ref(), &user, id, patch).await?;
    Ok(ApiResponse::success(
        format!("{} updated successfully", M::ENTITY),
        document_to_api_value(&document),
    ))
}

pub async fn delete<M: Listing>(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Value> {
    let document = listing_service::delete::<M>(state.store.as_ref(), state.storage.as_ref(), &user, id).await?;
    tracing::info!("User {} deleted {} {}", user.user_id, M::CATEGORY, id);
    Ok(ApiResponse::success(
        format!("{} deleted successfully", M::ENTITY),
        document_to_api_value(&document),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlRequest {
    pub image_data: Vec<FileDescriptor>,
}

pub async fn signed_urls<M: Listing>(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignedUrlRequest>,
) -> ApiResult<UploadBatch> {
    let batch = image_service::issue_upload_urls(
        state.storage.as_ref(),
        &state.config.storage,
        &M::CATEGORY.image_folder(),
        &request.image_data,
    )
    .await?;
    Ok(ApiResponse::success(
        format!("Signed URLs generated for {} images", M::CATEGORY),
        batch,
    ))
}
