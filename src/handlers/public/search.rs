// handlers/public/search.rs - GET /api/v1/spaces/search and /api/v1/spaces/new

use axum::extract::State;
use serde_json::Value;

use crate::api::Page;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, QueryParams};
use crate::services::search_service::{self, SearchQuery};

/// Unified feed across rooms, flats, houses and lands
pub async fn search(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ApiResult<Page<Value>> {
    let page = search_service::search(state.store.as_ref(), &query, state.config.api.max_page_size).await?;
    Ok(ApiResponse::success("Spaces retrieved successfully", page))
}

pub async fn new_listings(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ApiResult<Page<Value>> {
    let page = search_service::new_listings(state.store.as_ref(), &query, state.config.api.max_page_size).await?;
    Ok(ApiResponse::success("New spaces retrieved successfully", page))
}
