// handlers/elevated/admin.rs - /api/v1/admin/* and /api/v1/addresses/addresses-with-user

use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use crate::api::Page;
use crate::app::AppState;
use crate::handlers::public::listings::capitalized_plural;
use crate::middleware::{ApiResponse, ApiResult, QueryParams};
use crate::models::Listing;
use crate::services::address_service;
use crate::services::admin_service::{self, DEFAULT_DASHBOARD_DAYS};
use crate::services::listing_service::PageQuery;
use crate::services::search_service::parse_days;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub days: Option<String>,
}

/// Totals, growth and latest documents for users and every searchable kind
pub async fn dashboard(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DashboardQuery>,
) -> ApiResult<Value> {
    let days = parse_days(query.days.as_deref(), DEFAULT_DASHBOARD_DAYS)?;
    let stats = admin_service::dashboard(state.store.as_ref(), days).await?;
    Ok(ApiResponse::success("Dashboard statistics retrieved successfully", stats))
}

pub async fn user_details(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<Page<Value>> {
    let page = admin_service::user_details(state.store.as_ref(), &query, state.config.api.max_page_size).await?;
    Ok(ApiResponse::success("Users found successfully", page))
}

pub async fn listings_with_owner<M: Listing>(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<Vec<Value>> {
    let (items, pagination) =
        admin_service::with_owner(state.store.as_ref(), M::COLLECTION, &query, state.config.api.max_page_size).await?;
    Ok(ApiResponse::success(format!("{} found successfully", capitalized_plural::<M>()), items).with_pagination(pagination))
}

pub async fn addresses_with_user(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResult<Vec<Value>> {
    let (items, pagination) =
        address_service::with_user(state.store.as_ref(), &query, state.config.api.max_page_size).await?;
    Ok(ApiResponse::success("Addresses found successfully", items).with_pagination(pagination))
}
