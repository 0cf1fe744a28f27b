// Admin dashboard statistics and owner-joined overviews
use chrono::{Duration, Utc};
use futures::future::try_join_all;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::format::{document_to_api_value, owner_summary, project, user_profile};
use crate::api::{AdminPagination, Page, PageRequest};
use crate::database::store::{Collection, Document, DocumentStore};
use crate::error::ApiError;
use crate::filter::{Filter, FindQuery, Sort};
use crate::types::SpaceCategory;

use super::listing_service::{paginate, PageQuery, DEFAULT_LIMIT};

pub const DEFAULT_DASHBOARD_DAYS: i64 = 7;
const LATEST_COUNT: u64 = 5;

const USER_LATEST_FIELDS: [&str; 6] = ["email", "userAvatarUrl", "phoneNumber", "name", "isVerified", "createdAt"];
const LISTING_LATEST_FIELDS: [&str; 10] = [
    "title",
    "fare",
    "city",
    "chowk",
    "genderPreference",
    "nearPopularPlace",
    "spaceType",
    "descriptionOfSpace",
    "spaceImagesUrl",
    "createdAt",
];

/// Growth of the last window relative to what existed before it, as a percentage with two decimals
pub fn growth_rate(new_count: u64, total_count: u64) -> String {
    let previous = total_count.saturating_sub(new_count).max(1);
    format!("{:.2}", new_count as f64 / previous as f64 * 100.0)
}

/// Names used for one entity in the dashboard payload
struct DashboardEntry {
    collection: Collection,
    total_key: String,
    growth_key: String,
    latest_key: &'static str,
    fields: &'static [&'static str],
}

fn dashboard_entries() -> Vec<DashboardEntry> {
    let mut entries = vec![DashboardEntry {
        collection: Collection::Users,
        total_key: "totalUsers".to_string(),
        growth_key: "userGrowth".to_string(),
        latest_key: "users",
        fields: &USER_LATEST_FIELDS,
    }];
    entries.extend(SpaceCategory::SEARCHABLE.into_iter().map(|category| DashboardEntry {
        collection: category.collection(),
        total_key: format!("total{}s", category.label()),
        growth_key: format!("{}Growth", category.as_str()),
        latest_key: category.plural(),
        fields: &LISTING_LATEST_FIELDS,
    }));
    entries
}

/// Totals, growth over the last `days` days and the five newest documents per entity
pub async fn dashboard(store: &dyn DocumentStore, days: i64) -> Result<Value, ApiError> {
    let since = Utc::now() - Duration::days(days);
    let entries = dashboard_entries();

    let stats = try_join_all(entries.iter().map(|entry| async move {
        let latest_query = FindQuery::new(Filter::new()).sort(Sort::newest_first()).limit(LATEST_COUNT);
        let all = Filter::new();
        let recent = Filter::new().created_after(since);
        tokio::try_join!(
            store.count(entry.collection, &all),
            store.count(entry.collection, &recent),
            store.find(entry.collection, &latest_query),
        )
    }))
    .await?;

    let mut overview = Map::new();
    let mut latest = Map::new();
    for (entry, (total, new_count, docs)) in entries.iter().zip(stats) {
        overview.insert(entry.total_key.clone(), json!(total));
        overview.insert(entry.growth_key.clone(), json!(growth_rate(new_count, total)));
        let items: Vec<Value> = docs.iter().map(|doc| project(doc, entry.fields)).collect();
        latest.insert(entry.latest_key.to_string(), Value::Array(items));
    }
    overview.insert("period".into(), json!(format!("{} days", days)));

    Ok(json!({ "overview": overview, "latest": latest }))
}

/// Users without password hashes, newest first
pub async fn user_details(store: &dyn DocumentStore, query: &PageQuery, max_page_size: u64) -> Result<Page<Value>, ApiError> {
    let request = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT, max_page_size);
    let page = paginate(store, Collection::Users, Filter::new(), Sort::newest_first(), request).await?;
    Ok(page.map(|doc| user_profile(&doc)))
}

async fn owners_by_id(store: &dyn DocumentStore, documents: &[Document]) -> Result<HashMap<Uuid, Document>, ApiError> {
    let mut ids: Vec<Uuid> = documents.iter().filter_map(Document::owner_id).collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let owners = store.find(Collection::Users, &FindQuery::new(Filter::new().id_in(ids))).await?;
    Ok(owners.into_iter().map(|owner| (owner.id, owner)).collect())
}

/// One page of a collection, each document carrying its owner's summary under `user`.
/// Documents whose owner no longer exists get `user: null`.
pub async fn with_owner(
    store: &dyn DocumentStore,
    collection: Collection,
    query: &PageQuery,
    max_page_size: u64,
) -> Result<(Vec<Value>, AdminPagination), ApiError> {
    let request = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT, max_page_size);
    let page = paginate(store, collection, Filter::new(), Sort::newest_first(), request).await?;
    let owners = owners_by_id(store, &page.docs).await?;

    let items = page
        .docs
        .iter()
        .map(|doc| {
            let mut value = document_to_api_value(doc);
            let owner = doc
                .owner_id()
                .and_then(|id| owners.get(&id))
                .map(owner_summary)
                .unwrap_or(Value::Null);
            if let Value::Object(map) = &mut value {
                map.insert("user".into(), owner);
            }
            value
        })
        .collect();

    Ok((items, AdminPagination::new(page.total_docs, request)))
}
