// handlers/public/users.rs - POST /api/v1/users/get-signed-url
//
// Public so a profile photo can be uploaded before the account exists.

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::image_service::{self, FileDescriptor};

const AVATAR_FOLDER: &str = "user-avatar";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarUploadRequest {
    pub image_data: FileDescriptor,
}

pub async fn avatar_signed_url(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AvatarUploadRequest>,
) -> ApiResult<Value> {
    let (presigned_post, image_url) = image_service::issue_upload_url(
        state.storage.as_ref(),
        &state.config.storage,
        AVATAR_FOLDER,
        &request.image_data,
    )
    .await?;
    Ok(ApiResponse::success(
        "Signed URL generated successfully",
        json!({ "imageUrl": image_url, "presignedPost": presigned_post }),
    ))
}
