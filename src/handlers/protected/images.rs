// handlers/protected/images.rs - /api/v1/images/{upload,delete,delete-multiple}

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::image_service::{self, DeleteReport, FileDescriptor, UploadBatch};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub folder: String,
    pub image_data: Vec<FileDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    pub urls: Vec<String>,
}

/// Batch of presigned POST credentials for an arbitrary folder
pub async fn upload(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UploadRequest>,
) -> ApiResult<UploadBatch> {
    image_service::validate_folder(&request.folder)?;
    let batch = image_service::issue_upload_urls(
        state.storage.as_ref(),
        &state.config.storage,
        &request.folder,
        &request.image_data,
    )
    .await?;
    Ok(ApiResponse::success("Upload URLs generated successfully", batch))
}

/// A failed delete is a 502 here; only cascades swallow storage errors
pub async fn delete(State(state): State<AppState>, JsonBody(request): JsonBody<DeleteRequest>) -> ApiResult<Value> {
    image_service::delete_image(state.storage.as_ref(), &request.url).await?;
    Ok(ApiResponse::success("Image deleted successfully", json!({ "deletedUrl": request.url })))
}

pub async fn delete_many(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DeleteManyRequest>,
) -> ApiResult<DeleteReport> {
    if request.urls.is_empty() {
        return Err(ApiError::invalid_field("urls", "At least one URL is required"));
    }
    let max = state.config.storage.max_batch_files;
    if request.urls.len() > max {
        return Err(ApiError::invalid_field(
            "urls",
            format!("A maximum of {} images can be deleted at once", max),
        ));
    }
    let report = image_service::delete_images(state.storage.as_ref(), &request.urls).await;
    Ok(ApiResponse::success("Images deleted successfully", report))
}
