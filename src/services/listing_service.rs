// Generic CRUD over the listing collections (rooms, flats, houses, lands, apartments)
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{Page, PageRequest};
use crate::database::store::{Collection, Document, DocumentStore};
use crate::error::ApiError;
use crate::filter::{Filter, FindQuery, Sort, SortDirection, SortField};
use crate::middleware::AuthUser;
use crate::models::{merge_patch, parse_model, to_body, with_owner, Listing};
use crate::storage::ObjectStorage;
use crate::types::{GenderPreference, ListingType};

use super::image_service;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MY_LISTINGS_LIMIT: u64 = 15;

/// Query string of the public list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub fare_min: Option<f64>,
    pub fare_max: Option<f64>,
    pub city: Option<String>,
    pub chowk: Option<String>,
    pub near_popular_place: Option<String>,
    /// Matches city, chowk or municipality
    pub location_query: Option<String>,
    pub is_available: Option<bool>,
    pub gender_preference: Option<GenderPreference>,
    pub listing_type: Option<ListingType>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortDirection>,
}

impl ListingQuery {
    pub fn filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(min) = self.fare_min {
            filter = filter.gte("fare", min);
        }
        if let Some(max) = self.fare_max {
            filter = filter.lte("fare", max);
        }
        for (field, value) in [
            ("city", &self.city),
            ("chowk", &self.chowk),
            ("nearPopularPlace", &self.near_popular_place),
        ] {
            if let Some(needle) = non_blank(value) {
                filter = filter.contains(field, needle);
            }
        }
        if let Some(needle) = non_blank(&self.location_query) {
            filter = filter.contains_any(&["city", "chowk", "municipality"], needle);
        }
        if let Some(available) = self.is_available {
            filter = filter.eq("isAvailable", available);
        }
        if let Some(preference) = self.gender_preference {
            filter = filter.eq("genderPreference", json!(preference));
        }
        if let Some(listing_type) = self.listing_type {
            filter = filter.eq("listingType", json!(listing_type));
        }
        filter
    }

    pub fn sort(&self) -> Sort {
        Sort::new(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
    }
}

/// Page window of the "my listings" endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Count and fetch one page concurrently
pub async fn paginate(
    store: &dyn DocumentStore,
    collection: Collection,
    filter: Filter,
    sort: Sort,
    request: PageRequest,
) -> Result<Page<Document>, ApiError> {
    let query = FindQuery::new(filter.clone()).sort(sort).skip(request.skip()).limit(request.limit);
    let (total, docs) = tokio::try_join!(store.count(collection, &filter), store.find(collection, &query))?;
    Ok(Page::new(docs, total, request))
}

pub async fn create<M: Listing>(store: &dyn DocumentStore, owner: Uuid, payload: Value) -> Result<Document, ApiError> {
    store.get(Collection::Users, owner, "User").await?;

    let listing: M = parse_model(with_owner(payload, owner)?)?;
    let document = store.insert(M::COLLECTION, to_body(&listing)?).await?;
    tracing::info!("Created {} {} for user {}", M::CATEGORY, document.id, owner);
    Ok(document)
}

pub async fn list<M: Listing>(
    store: &dyn DocumentStore,
    query: &ListingQuery,
    max_page_size: u64,
) -> Result<Page<Document>, ApiError> {
    let request = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT, max_page_size);
    paginate(store, M::COLLECTION, query.filter(), query.sort(), request).await
}

pub async fn list_owned<M: Listing>(
    store: &dyn DocumentStore,
    owner: Uuid,
    query: &PageQuery,
    max_page_size: u64,
) -> Result<Page<Document>, ApiError> {
    let request = PageRequest::new(query.page, query.limit, MY_LISTINGS_LIMIT, max_page_size);
    let filter = Filter::new().eq("userId", owner.to_string());
    paginate(store, M::COLLECTION, filter, Sort::newest_first(), request).await
}

pub async fn get<M: Listing>(store: &dyn DocumentStore, id: Uuid) -> Result<Document, ApiError> {
    Ok(store.get(M::COLLECTION, id, M::ENTITY).await?)
}

/// Owner-or-admin partial update; the merged document is fully revalidated
pub async fn update<M: Listing>(
    store: &dyn DocumentStore,
    requester: &AuthUser,
    id: Uuid,
    patch: Value,
) -> Result<Document, ApiError> {
    let existing = store.get(M::COLLECTION, id, M::ENTITY).await?;
    requester.ensure_can_manage(existing.owner_id())?;

    let listing: M = parse_model(merge_patch(&existing.body, patch)?)?;
    store
        .replace(M::COLLECTION, id, to_body(&listing)?)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} not found", M::ENTITY)))
}

/// Owner-or-admin delete. Stored photos are removed best effort first.
pub async fn delete<M: Listing>(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    requester: &AuthUser,
    id: Uuid,
) -> Result<Document, ApiError> {
    let existing = store.get(M::COLLECTION, id, M::ENTITY).await?;
    requester.ensure_can_manage(existing.owner_id())?;

    image_service::cleanup_images(storage, &existing.image_urls()).await;

    store
        .delete_by_id(M::COLLECTION, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} not found", M::ENTITY)))
}
