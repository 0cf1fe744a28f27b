mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{room_payload, TestServer, PUBLIC_BASE};

#[tokio::test]
async fn create_room_echoes_fare_and_normalises_text() -> Result<()> {
    let server = TestServer::start().await?;
    let (owner, token) = server.signup("owner@example.com", 9800000010).await?;

    let (status, body) = server.post("/api/v1/rooms", Some(&token), room_payload(12500.0, " Pokhara ")).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Room created successfully");
    assert_eq!(body["data"]["fare"], 12500);
    assert_eq!(body["data"]["city"], "pokhara");
    assert_eq!(body["data"]["userId"], owner.to_string());
    assert_eq!(body["data"]["spaceCategories"], "room");
    assert_eq!(body["data"]["isAvailable"], true);
    assert!(body["data"]["_id"].is_string());
    assert!(body["data"]["createdAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn negative_fare_is_rejected_and_nothing_is_stored() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("neg@example.com", 9800000011).await?;

    let (status, body) = server.post("/api/v1/rooms", Some(&token), room_payload(-5.0, "Pokhara")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["fare: Fare must be non-negative"]));

    let mut missing = room_payload(100.0, "Pokhara");
    missing.as_object_mut().map(|m| m.remove("chowk"));
    let (status, _) = server.post("/api/v1/rooms", Some(&token), missing).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = server.get("/api/v1/rooms", None).await?;
    assert_eq!(body["data"]["totalDocs"], 0);
    Ok(())
}

#[tokio::test]
async fn writes_need_a_writer_role() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, guest) = server.seed_user("guest@example.com", 9800000012, &[cityhom_api::types::Role::Guest]).await?;

    let (status, _) = server.post("/api/v1/rooms", None, room_payload(100.0, "Pokhara")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server.post("/api/v1/rooms", Some(&guest), room_payload(100.0, "Pokhara")).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden: Insufficient permissions");
    Ok(())
}

#[tokio::test]
async fn list_filters_sorts_and_paginates() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("lister@example.com", 9800000013).await?;
    for (fare, city) in [(9000.0, "Pokhara"), (4000.0, "Kathmandu"), (6000.0, "Pokhara"), (12000.0, "Butwal")] {
        let (status, _) = server.post("/api/v1/rooms", Some(&token), room_payload(fare, city)).await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = server.get("/api/v1/rooms?sortBy=fare&sortOrder=asc&limit=2&page=1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rooms retrieved successfully");
    let page = &body["data"];
    let fares: Vec<i64> = page["docs"].as_array().unwrap().iter().map(|d| d["fare"].as_i64().unwrap()).collect();
    assert_eq!(fares, vec![4000, 6000]);
    assert_eq!(page["totalDocs"], 4);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["hasNextPage"], true);
    assert_eq!(page["nextPage"], 2);

    let (_, body) = server.get("/api/v1/rooms?city=POKH&fareMin=7000", None).await?;
    let docs = body["data"]["docs"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["fare"], 9000);
    Ok(())
}

#[tokio::test]
async fn get_by_id_and_missing_or_bad_ids() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("finder@example.com", 9800000014).await?;
    let (_, created) = server.post("/api/v1/rooms", Some(&token), room_payload(5000.0, "Pokhara")).await?;
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = server.get(&format!("/api/v1/rooms/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room found successfully");

    let (status, body) = server.get(&format!("/api/v1/rooms/{}", uuid::Uuid::new_v4()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Room not found");

    let (status, body) = server.get("/api/v1/rooms/not-an-id", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Resource not found. Invalid: _id");
    Ok(())
}

#[tokio::test]
async fn only_owner_or_admin_may_update() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, owner) = server.signup("a@example.com", 9800000015).await?;
    let (_, stranger) = server.signup("b@example.com", 9800000016).await?;
    let (_, admin) = server.admin().await?;

    let (_, created) = server.post("/api/v1/rooms", Some(&owner), room_payload(5000.0, "Pokhara")).await?;
    let path = format!("/api/v1/rooms/{}", created["data"]["_id"].as_str().unwrap());

    let (status, _) = server.put(&path, Some(&stranger), json!({ "fare": 1 })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, body) = server.get(&path, None).await?;
    assert_eq!(body["data"]["fare"], 5000);

    let (status, body) = server.put(&path, Some(&owner), json!({ "fare": 5500, "userId": "someone-else" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room updated successfully");
    assert_eq!(body["data"]["fare"], 5500);
    assert_eq!(body["data"]["userId"], created["data"]["userId"]);

    let (status, body) = server.put(&path, Some(&admin), json!({ "fare": -1 })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["fare: Fare must be non-negative"]));

    let (status, body) = server.put(&path, Some(&admin), json!({ "isAvailable": false })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isAvailable"], false);
    Ok(())
}

#[tokio::test]
async fn delete_cleans_up_images_best_effort() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, owner) = server.signup("imgs@example.com", 9800000017).await?;

    let mut payload = room_payload(5000.0, "Pokhara");
    payload["spaceImagesUrl"] = json!([
        format!("{}/room-images/one.jpeg", PUBLIC_BASE),
        format!("{}/room-images/fail-two.png", PUBLIC_BASE),
        format!("{}/room-images/three%20x.webp", PUBLIC_BASE),
    ]);
    let (status, created) = server.post("/api/v1/rooms", Some(&owner), payload).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    let path = format!("/api/v1/rooms/{}", created["data"]["_id"].as_str().unwrap());

    let (status, body) = server.delete(&path, Some(&owner)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room deleted successfully");

    let mut attempted = server.storage.attempted_keys();
    attempted.sort();
    assert_eq!(attempted, vec!["room-images/fail-two.png", "room-images/one.jpeg", "room-images/three x.webp"]);
    let mut deleted = server.storage.deleted_keys();
    deleted.sort();
    assert_eq!(deleted, vec!["room-images/one.jpeg", "room-images/three x.webp"]);

    let (status, _) = server.get(&path, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn stranger_cannot_delete_but_admin_can() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, owner) = server.signup("owner@example.com", 9800000019).await?;
    let (_, stranger) = server.signup("stranger@example.com", 9800000020).await?;
    let (_, admin) = server.admin().await?;

    let image = format!("{}/room-images/kept.jpeg", PUBLIC_BASE);
    let mut payload = room_payload(6200.0, "Pokhara");
    payload["spaceImagesUrl"] = json!([image]);
    let (_, created) = server.post("/api/v1/rooms", Some(&owner), payload).await?;
    let path = format!("/api/v1/rooms/{}", created["data"]["_id"].as_str().unwrap());

    let (status, body) = server.delete(&path, Some(&stranger)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert!(server.storage.attempted_keys().is_empty());

    let (status, body) = server.get(&path, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fare"], 6200);
    assert_eq!(body["data"]["spaceImagesUrl"], json!([image]));

    let (status, body) = server.delete(&path, Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room deleted successfully");
    assert_eq!(server.storage.deleted_keys(), vec!["room-images/kept.jpeg"]);

    let (status, _) = server.get(&path, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn absurd_page_numbers_return_an_empty_page() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, owner) = server.signup("pages@example.com", 9800000021).await?;
    server.post("/api/v1/rooms", Some(&owner), room_payload(5000.0, "Pokhara")).await?;

    let (status, body) = server.get("/api/v1/rooms?page=18446744073709551615&limit=10", None).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["docs"], json!([]));
    assert_eq!(body["data"]["totalDocs"], 1);
    assert_eq!(body["data"]["hasNextPage"], false);
    Ok(())
}

#[tokio::test]
async fn my_listings_only_show_the_requesters() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, first) = server.signup("first@example.com", 9800000018).await?;
    let (_, second) = server.signup("second@example.com", 9800000019).await?;
    server.post("/api/v1/rooms", Some(&first), room_payload(1000.0, "Pokhara")).await?;
    server.post("/api/v1/rooms", Some(&first), room_payload(2000.0, "Pokhara")).await?;
    server.post("/api/v1/rooms", Some(&second), room_payload(3000.0, "Pokhara")).await?;

    let (status, body) = server.get("/api/v1/rooms/my-rooms", Some(&first)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Found my rooms successfully");
    assert_eq!(body["data"]["totalDocs"], 2);
    assert_eq!(body["data"]["limit"], 15);
    // newest first
    assert_eq!(body["data"]["docs"][0]["fare"], 2000);
    Ok(())
}

#[tokio::test]
async fn flats_and_lands_share_the_generic_routes() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("kinds@example.com", 9800000020).await?;

    let (status, body) = server.post("/api/v1/flats", Some(&token), common::flat_payload(25000.0, 2)).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Flat created successfully");
    assert_eq!(body["data"]["facility"]["wifi"], false);

    let (status, body) = server.post("/api/v1/lands", Some(&token), common::land_payload(5_000_000.0)).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["spaceCategories"], "land");

    let (status, body) = server.get("/api/v1/lands/my-lands", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalDocs"], 1);
    Ok(())
}
