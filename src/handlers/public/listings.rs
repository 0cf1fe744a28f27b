// handlers/public/listings.rs - GET /api/v1/{kind} and GET /api/v1/{kind}/:id
//
// Generic over the listing kind; `app.rs` instantiates one route set per
// collection (`list::<Room>`, `show::<Flat>`, ...).

use axum::extract::State;
use serde_json::Value;

use crate::api::{document_to_api_value, Page};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, IdPath, QueryParams};
use crate::models::Listing;
use crate::services::listing_service::{self, ListingQuery};

/// "rooms" -> "Rooms"
pub(crate) fn capitalized_plural<M: Listing>() -> String {
    let plural = M::CATEGORY.plural();
    let mut chars = plural.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn list<M: Listing>(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListingQuery>,
) -> ApiResult<Page<Value>> {
    let page = listing_service::list::<M>(state.store.as_ref(), &query, state.config.api.max_page_size).await?;
    let message = format!("{} retrieved successfully", capitalized_plural::<M>());
    Ok(ApiResponse::success(message, page.map(|doc| document_to_api_value(&doc))))
}

pub async fn show<M: Listing>(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Value> {
    let document = listing_service::get::<M>(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(
        format!("{} found successfully", M::ENTITY),
        document_to_api_value(&document),
    ))
}
