mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use cityhom_api::types::Role;
use common::{TestServer, PUBLIC_BASE};

fn file(name: &str, kind: &str, size: u64) -> Value {
    json!({ "fileName": name, "fileType": kind, "fileSize": size })
}

#[tokio::test]
async fn listing_signed_urls_use_the_kind_folder() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("photos@example.com", 9800000100).await?;

    let (status, body) = server
        .post(
            "/api/v1/houses/get-signed-url",
            Some(&token),
            json!({ "imageData": [file("front.jpg", "image/jpeg", 1000), file("back.webp", "image/webp", 2000)] }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let posts = body["data"]["presignedPosts"].as_array().cloned().unwrap_or_default();
    let urls = body["data"]["fileUrls"].as_array().cloned().unwrap_or_default();
    assert_eq!(posts.len(), 2);
    assert_eq!(urls.len(), 2);
    for (post, url) in posts.iter().zip(&urls) {
        let key = post["key"].as_str().unwrap_or_default();
        assert!(key.starts_with("house-images/"), "{}", key);
        assert_eq!(url.as_str(), Some(format!("{}/{}", PUBLIC_BASE, key).as_str()));
    }
    Ok(())
}

#[tokio::test]
async fn signed_urls_need_an_uploader_role() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, guest) = server.seed_user("g@example.com", 9800000101, &[Role::Guest]).await?;
    let (status, _) = server
        .post(
            "/api/v1/rooms/get-signed-url",
            Some(&guest),
            json!({ "imageData": [file("a.png", "image/png", 10)] }),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn upload_batch_is_validated() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("batch@example.com", 9800000102).await?;

    let too_many: Vec<Value> = (0..21).map(|i| file(&format!("{}.png", i), "image/png", 10)).collect();
    let (status, body) = server
        .post("/api/v1/images/upload", Some(&token), json!({ "folder": "room-images", "imageData": too_many }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["imageData: A maximum of 20 files can be uploaded at once"]));

    let (status, body) = server
        .post(
            "/api/v1/images/upload",
            Some(&token),
            json!({ "folder": "room-images", "imageData": [file("ok.png", "image/png", 10), file("", "text/plain", 0)] }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().cloned().unwrap_or_default();
    assert_eq!(errors.len(), 3, "{}", body);
    assert!(errors.iter().all(|e| e.as_str().unwrap_or_default().starts_with("imageData.1.")));

    let (status, _) = server
        .post(
            "/api/v1/images/upload",
            Some(&token),
            json!({ "folder": "../etc", "imageData": [file("ok.png", "image/png", 10)] }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .post(
            "/api/v1/images/upload",
            Some(&token),
            json!({ "folder": "misc", "imageData": [file("ok.png", "image/png", 10)] }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Upload URLs generated successfully");
    Ok(())
}

#[tokio::test]
async fn single_delete_reports_storage_failures() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("del@example.com", 9800000103).await?;
    let url = format!("{}/misc/photo.png", PUBLIC_BASE);

    let (status, body) = server
        .call(reqwest::Method::DELETE, "/api/v1/images/delete", Some(&token), Some(json!({ "url": url })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedUrl"], url);
    assert_eq!(server.storage.deleted_keys(), vec!["misc/photo.png"]);

    let (status, body) = server
        .call(
            reqwest::Method::DELETE,
            "/api/v1/images/delete",
            Some(&token),
            Some(json!({ "url": format!("{}/misc/fail.png", PUBLIC_BASE) })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);

    let (status, _) = server
        .call(reqwest::Method::DELETE, "/api/v1/images/delete", Some(&token), Some(json!({ "url": "not a url" })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn batch_delete_splits_successes_and_failures() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("many@example.com", 9800000104).await?;
    let ok = format!("{}/misc/keep-going.png", PUBLIC_BASE);
    let bad = format!("{}/misc/fail-here.png", PUBLIC_BASE);

    let (status, body) = server
        .call(
            reqwest::Method::DELETE,
            "/api/v1/images/delete-multiple",
            Some(&token),
            Some(json!({ "urls": [ok, bad] })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedUrls"], json!([ok]));
    assert_eq!(body["data"]["failedUrls"], json!([bad]));
    Ok(())
}

#[tokio::test]
async fn batch_delete_is_capped_at_the_batch_size() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.signup("capped@example.com", 9800000105).await?;
    let urls: Vec<String> = (0..21).map(|i| format!("{}/misc/{}.png", PUBLIC_BASE, i)).collect();

    let (status, body) = server
        .call(
            reqwest::Method::DELETE,
            "/api/v1/images/delete-multiple",
            Some(&token),
            Some(json!({ "urls": urls })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["urls: A maximum of 20 images can be deleted at once"]));
    assert!(server.storage.attempted_keys().is_empty());

    let (status, _) = server
        .call(
            reqwest::Method::DELETE,
            "/api/v1/images/delete-multiple",
            Some(&token),
            Some(json!({ "urls": &urls[..20] })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.storage.attempted_keys().len(), 20);
    Ok(())
}
