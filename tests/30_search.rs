mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use cityhom_api::database::{Collection, Document, DocumentStore};
use common::{flat_payload, land_payload, room_payload, TestServer};

fn fares(body: &Value) -> Vec<i64> {
    body["data"]["docs"]
        .as_array()
        .map(|docs| docs.iter().filter_map(|d| d["fare"].as_i64()).collect())
        .unwrap_or_default()
}

async fn seed_mixed(server: &TestServer) -> Result<String> {
    let (_, token) = server.signup("seller@example.com", 9800000030).await?;
    server.post("/api/v1/rooms", Some(&token), room_payload(8000.0, "Pokhara")).await?;
    server.post("/api/v1/rooms", Some(&token), room_payload(3000.0, "Kathmandu")).await?;
    server.post("/api/v1/flats", Some(&token), flat_payload(5000.0, 1)).await?;
    server.post("/api/v1/flats", Some(&token), flat_payload(20000.0, 3)).await?;
    server.post("/api/v1/lands", Some(&token), land_payload(1000.0)).await?;
    Ok(token)
}

#[tokio::test]
async fn search_merges_collections_and_sorts_by_fare() -> Result<()> {
    let server = TestServer::start().await?;
    seed_mixed(&server).await?;

    let (status, body) = server.get("/api/v1/spaces/search?sortBy=fare&sortOrder=asc&limit=2&page=1", None).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(fares(&body), vec![1000, 3000]);
    assert_eq!(body["data"]["totalDocs"], 5);
    assert_eq!(body["data"]["totalPages"], 3);
    assert_eq!(body["data"]["hasNextPage"], true);
    assert_eq!(body["data"]["docs"][0]["spaceCategories"], "land");
    assert_eq!(body["data"]["docs"][1]["spaceCategories"], "room");

    let (_, body) = server.get("/api/v1/spaces/search?sortBy=fare&sortOrder=asc&limit=2&page=3", None).await?;
    assert_eq!(fares(&body), vec![20000]);
    assert_eq!(body["data"]["hasNextPage"], false);
    Ok(())
}

#[tokio::test]
async fn search_past_the_last_page_is_empty_not_an_error() -> Result<()> {
    let server = TestServer::start().await?;
    seed_mixed(&server).await?;

    let (status, body) = server.get("/api/v1/spaces/search?page=18446744073709551615", None).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(fares(&body).is_empty());
    assert_eq!(body["data"]["totalDocs"], 5);
    assert_eq!(body["data"]["hasPrevPage"], true);
    Ok(())
}

#[tokio::test]
async fn search_filters_by_category_fare_and_bedrooms() -> Result<()> {
    let server = TestServer::start().await?;
    seed_mixed(&server).await?;

    let (_, body) = server.get("/api/v1/spaces/search?spaceCategories=room,flat&minFare=4000&sortBy=fare&sortOrder=desc", None).await?;
    assert_eq!(fares(&body), vec![20000, 8000, 5000]);

    // bedrooms only constrain kinds that have them
    let (_, body) = server.get("/api/v1/spaces/search?spaceCategories=flat,room&minBedrooms=2&sortBy=fare&sortOrder=asc", None).await?;
    assert_eq!(fares(&body), vec![3000, 8000, 20000]);

    let (_, body) = server.get("/api/v1/spaces/search?locationQuery=kath&sortBy=fare&sortOrder=asc", None).await?;
    assert_eq!(fares(&body), vec![3000, 5000, 20000]);
    Ok(())
}

#[tokio::test]
async fn search_rejects_unknown_categories() -> Result<()> {
    let server = TestServer::start().await?;
    let (status, body) = server.get("/api/v1/spaces/search?spaceCategories=castle", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn apartments_are_not_part_of_the_feed() -> Result<()> {
    let server = TestServer::start().await?;
    let Value::Object(map) = json!({
        "userId": Uuid::new_v4().to_string(),
        "city": "pokhara",
        "chowk": "lakeside",
        "fare": 1,
        "spaceCategories": "apartment",
    }) else {
        unreachable!()
    };
    server.store.insert(Collection::Apartments, map).await?;

    let (_, body) = server.get("/api/v1/spaces/search", None).await?;
    assert_eq!(body["data"]["totalDocs"], 0);
    assert_eq!(body["data"]["totalPages"], 1);
    Ok(())
}

#[tokio::test]
async fn new_listings_respect_the_day_window() -> Result<()> {
    let server = TestServer::start().await?;
    let now = Utc::now();
    for (days_old, fare) in [(2, 100), (40, 200), (400, 300)] {
        let at = now - Duration::days(days_old);
        let Value::Object(body) = json!({
            "userId": Uuid::new_v4().to_string(),
            "city": "pokhara",
            "chowk": "lakeside",
            "fare": fare,
            "spaceCategories": "room",
            "isAvailable": true,
            "spaceImagesUrl": [],
        }) else {
            unreachable!()
        };
        let document = Document { id: Uuid::new_v4(), created_at: at, updated_at: at, body };
        server.store.insert_document(Collection::Rooms, document).await?;
    }

    let (status, body) = server.get("/api/v1/spaces/new", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fares(&body), vec![100]);

    let (_, body) = server.get("/api/v1/spaces/new?days=730", None).await?;
    assert_eq!(fares(&body), vec![100, 200, 300]);

    let (status, body) = server.get("/api/v1/spaces/new?days=0", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid days parameter. Must be between 1 and 730.");
    Ok(())
}
