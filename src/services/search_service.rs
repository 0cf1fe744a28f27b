// Unified feed across the listing collections.
//
// Each collection is queried concurrently with the same filter and order, the
// results are concatenated and stably re-sorted in memory, then the page
// window is cut. Totals therefore cover the whole union.
use chrono::{Duration, Utc};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::format::project;
use crate::api::{Page, PageRequest};
use crate::database::store::{Document, DocumentStore};
use crate::error::ApiError;
use crate::filter::{Filter, FilterOrder, FindQuery, Sort, SortDirection, SortField};
use crate::types::{GenderPreference, SpaceCategory};

use super::listing_service::{non_blank, DEFAULT_LIMIT};

pub const DEFAULT_NEW_DAYS: i64 = 30;
pub const MAX_DAYS: i64 = 730;

/// Fields of the summary each feed item is projected to
const SUMMARY_FIELDS: [&str; 13] = [
    "spaceCategories",
    "title",
    "city",
    "chowk",
    "fare",
    "createdAt",
    "genderPreference",
    "isSpaceProviderLiving",
    "spaceImagesUrl",
    "descriptionOfSpace",
    "nearPopularPlace",
    "isAvailable",
    "listingType",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Comma separated kinds; all searchable kinds when absent
    pub space_categories: Option<String>,
    /// Matches city or chowk
    pub location_query: Option<String>,
    pub min_fare: Option<f64>,
    pub max_fare: Option<f64>,
    pub gender_preference: Option<GenderPreference>,
    pub is_space_provider_living: Option<bool>,
    pub is_available: Option<bool>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortDirection>,
    pub min_bedrooms: Option<u32>,
    pub limit: Option<u64>,
    pub page: Option<u64>,
    /// Only used by the new-listings feed
    pub days: Option<String>,
}

impl SearchQuery {
    /// Kinds to query, in feed order. Unknown names are a validation error.
    pub fn categories(&self) -> Result<Vec<SpaceCategory>, ApiError> {
        let Some(raw) = non_blank(&self.space_categories) else {
            return Ok(SpaceCategory::SEARCHABLE.to_vec());
        };
        let mut wanted = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let category = SpaceCategory::SEARCHABLE
                .into_iter()
                .find(|c| c.as_str().eq_ignore_ascii_case(name))
                .ok_or_else(|| ApiError::invalid_field("spaceCategories", format!("Unknown space category: {}", name)))?;
            if !wanted.contains(&category) {
                wanted.push(category);
            }
        }
        // Keep the canonical collection order so ties merge predictably
        Ok(SpaceCategory::SEARCHABLE.into_iter().filter(|c| wanted.contains(c)).collect())
    }

    fn base_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(min) = self.min_fare {
            filter = filter.gte("fare", min);
        }
        if let Some(max) = self.max_fare {
            filter = filter.lte("fare", max);
        }
        if let Some(available) = self.is_available {
            filter = filter.eq("isAvailable", available);
        }
        if let Some(preference) = self.gender_preference {
            filter = filter.eq("genderPreference", json!(preference));
        }
        if let Some(living) = self.is_space_provider_living {
            filter = filter.eq("isSpaceProviderLiving", living);
        }
        if let Some(needle) = non_blank(&self.location_query) {
            filter = filter.contains_any(&["city", "chowk"], needle);
        }
        filter
    }

    /// Filter for one collection; bedroom bounds apply only where bedrooms exist
    pub fn filter_for(&self, category: SpaceCategory) -> Filter {
        let mut filter = self.base_filter();
        if let Some(min) = self.min_bedrooms {
            if category.has_bedrooms() {
                filter = filter.gte("noOfBedrooms", f64::from(min));
            }
        }
        filter
    }

    pub fn sort(&self) -> Sort {
        Sort::new(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
    }
}

/// `days` as an integer in 1..=730
pub fn parse_days(raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    let days = match raw.map(str::trim) {
        None | Some("") => default,
        Some(value) => value.parse::<i64>().unwrap_or(0),
    };
    if (1..=MAX_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ApiError::bad_request("Invalid days parameter. Must be between 1 and 730."))
    }
}

async fn collect(
    store: &dyn DocumentStore,
    categories: &[SpaceCategory],
    filter_for: impl Fn(SpaceCategory) -> Filter,
    sort: Sort,
) -> Result<Vec<(SpaceCategory, Document)>, ApiError> {
    let per_collection = try_join_all(categories.iter().map(|&category| {
        let query = FindQuery::new(filter_for(category)).sort(sort);
        async move {
            store
                .find(category.collection(), &query)
                .await
                .map(|docs| docs.into_iter().map(|doc| (category, doc)).collect::<Vec<_>>())
        }
    }))
    .await?;

    let mut merged: Vec<(SpaceCategory, Document)> = per_collection.into_iter().flatten().collect();
    merged.sort_by(|(_, a), (_, b)| FilterOrder::compare(&sort, a, b));
    Ok(merged)
}

fn summarize(category: SpaceCategory, document: &Document) -> Value {
    let mut summary = project(document, &SUMMARY_FIELDS);
    if let Value::Object(map) = &mut summary {
        map.insert("spaceCategories".into(), json!(category));
    }
    summary
}

fn window(merged: Vec<(SpaceCategory, Document)>, request: PageRequest) -> Page<Value> {
    let total = merged.len() as u64;
    let skip = usize::try_from(request.skip()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.limit).unwrap_or(usize::MAX);
    let docs = merged
        .iter()
        .skip(skip)
        .take(take)
        .map(|(category, doc)| summarize(*category, doc))
        .collect();
    Page::new(docs, total, request)
}

pub async fn search(store: &dyn DocumentStore, query: &SearchQuery, max_page_size: u64) -> Result<Page<Value>, ApiError> {
    let categories = query.categories()?;
    let request = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT, max_page_size);
    let merged = collect(store, &categories, |c| query.filter_for(c), query.sort()).await?;
    Ok(window(merged, request))
}

/// Listings created in the last `days` days, newest first
pub async fn new_listings(
    store: &dyn DocumentStore,
    query: &SearchQuery,
    max_page_size: u64,
) -> Result<Page<Value>, ApiError> {
    let days = parse_days(query.days.as_deref(), DEFAULT_NEW_DAYS)?;
    let since = Utc::now() - Duration::days(days);
    let categories = query.categories()?;
    let request = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT, max_page_size);
    let merged = collect(
        store,
        &categories,
        |c| query.filter_for(c).created_after(since),
        Sort::newest_first(),
    )
    .await?;
    Ok(window(merged, request))
}
