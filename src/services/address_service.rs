// One postal address per user
use serde_json::Value;
use uuid::Uuid;

use crate::api::AdminPagination;
use crate::database::store::{Collection, Document, DocumentStore};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::AuthUser;
use crate::models::{merge_patch, parse_model, to_body, with_owner, Address, Model};

use super::admin_service;
use super::listing_service::PageQuery;

pub async fn create(store: &dyn DocumentStore, requester: &AuthUser, payload: Value) -> Result<Document, ApiError> {
    let owned = Filter::new().eq("userId", requester.user_id.to_string());
    if store.find_one(Address::COLLECTION, &owned).await?.is_some() {
        return Err(ApiError::bad_request("You already have an address"));
    }

    let address: Address = parse_model(with_owner(payload, requester.user_id)?)?;
    Ok(store.insert(Address::COLLECTION, to_body(&address)?).await?)
}

async fn managed(store: &dyn DocumentStore, requester: &AuthUser, id: Uuid) -> Result<Document, ApiError> {
    let address = store.get(Address::COLLECTION, id, Address::ENTITY).await?;
    requester.ensure_can_manage(address.owner_id())?;
    Ok(address)
}

pub async fn get(store: &dyn DocumentStore, requester: &AuthUser, id: Uuid) -> Result<Document, ApiError> {
    managed(store, requester, id).await
}

pub async fn update(store: &dyn DocumentStore, requester: &AuthUser, id: Uuid, patch: Value) -> Result<Document, ApiError> {
    let existing = managed(store, requester, id).await?;
    let address: Address = parse_model(merge_patch(&existing.body, patch)?)?;
    store
        .replace(Address::COLLECTION, id, to_body(&address)?)
        .await?
        .ok_or_else(|| ApiError::not_found("Address not found"))
}

pub async fn delete(store: &dyn DocumentStore, requester: &AuthUser, id: Uuid) -> Result<Document, ApiError> {
    managed(store, requester, id).await?;
    store
        .delete_by_id(Address::COLLECTION, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Address not found"))
}

/// Admin view: addresses with their owner's summary
pub async fn with_user(
    store: &dyn DocumentStore,
    query: &PageQuery,
    max_page_size: u64,
) -> Result<(Vec<Value>, AdminPagination), ApiError> {
    admin_service::with_owner(store, Collection::Addresses, query, max_page_size).await
}
