#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use cityhom_api::app::{app, AppState};
use cityhom_api::auth::{hash_password, issue_access_token};
use cityhom_api::config::AppConfig;
use cityhom_api::database::{Collection, DocumentStore, MemoryStore};
use cityhom_api::storage::{ObjectStorage, PresignedPost, StorageError};
use cityhom_api::types::Role;

pub const PUBLIC_BASE: &str = "https://cdn.cityhom.test";

/// Storage double: issues fake credentials, records deletes and fails any key containing "fail"
#[derive(Default)]
pub struct MockStorage {
    pub attempted: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockStorage {
    /// Every key a delete was issued for, failed ones included
    pub fn attempted_keys(&self) -> Vec<String> {
        self.attempted.lock().map(|d| d.clone()).unwrap_or_default()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn presigned_post(&self, key: &str, content_type: &str) -> Result<PresignedPost, StorageError> {
        let mut fields = BTreeMap::new();
        fields.insert("key".to_string(), key.to_string());
        fields.insert("Content-Type".to_string(), content_type.to_string());
        Ok(PresignedPost {
            url: "https://storage.cityhom.test/bucket".to_string(),
            fields,
            key: key.to_string(),
        })
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if let Ok(mut attempted) = self.attempted.lock() {
            attempted.push(key.to_string());
        }
        if key.contains("fail") {
            return Err(StorageError::Status { status: 500, key: key.to_string() });
        }
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push(key.to_string());
        }
        Ok(())
    }

    fn public_base_url(&self) -> &str {
        PUBLIC_BASE
    }
}

/// In-process server over a fresh MemoryStore, bound to an ephemeral port
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub storage: Arc<MockStorage>,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(AppConfig::development()).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let storage = Arc::new(MockStorage::default());
        let state = AppState::new(store.clone(), storage.clone(), config.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = app(state).into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            store,
            storage,
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode the JSON envelope
    pub async fn call(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut builder = self.request(method, path, token);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let res = builder.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.context("response was not JSON")?;
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.call(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.call(Method::DELETE, path, token, None).await
    }

    /// Sign up through the API; returns (user id, access token)
    pub async fn signup(&self, email: &str, phone: i64) -> Result<(Uuid, String)> {
        let (status, body) = self
            .post(
                "/api/v1/auth/signup",
                None,
                json!({ "name": "Test User", "email": email, "password": "secret12", "phoneNumber": phone }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "signup failed: {} {}", status, body);
        let id = body["data"]["user"]["_id"].as_str().context("missing user id")?.parse()?;
        let token = body["data"]["accessToken"].as_str().context("missing token")?.to_string();
        Ok((id, token))
    }

    /// Insert a user with explicit roles straight into the store; returns (user id, access token)
    pub async fn seed_user(&self, email: &str, phone: i64, roles: &[Role]) -> Result<(Uuid, String)> {
        let body = json!({
            "name": "seeded user",
            "email": email,
            "password": hash_password("secret12").map_err(|e| anyhow::anyhow!("{}", e))?,
            "phoneNumber": phone,
            "isVerified": false,
            "isEmailVerified": false,
            "roles": roles,
        });
        let Value::Object(map) = body else { unreachable!() };
        let document = self.store.insert(Collection::Users, map).await?;
        let token = issue_access_token(&self.config.security, document.id, roles)?;
        Ok((document.id, token))
    }

    pub async fn admin(&self) -> Result<(Uuid, String)> {
        self.seed_user("admin@cityhom.test", 9800000001, &[Role::Admin]).await
    }
}

pub fn room_payload(fare: f64, city: &str) -> Value {
    json!({
        "district": "Kaski",
        "city": city,
        "chowk": "Lakeside",
        "nearPopularPlace": "Fewa Lake",
        "descriptionOfSpace": "Bright room with a lake view",
        "rulesOfLiving": "No smoking",
        "phoneNumber": 9812345678i64,
        "fare": fare,
        "genderPreference": "forAll",
        "spaceImagesUrl": []
    })
}

pub fn flat_payload(fare: f64, bedrooms: u32) -> Value {
    json!({
        "city": "Kathmandu",
        "chowk": "Baneshwor",
        "nearPopularPlace": "Everest Hotel",
        "descriptionOfSpace": "Two floor flat",
        "rulesOfLiving": "Families only",
        "phoneNumber": 9812345678i64,
        "fare": fare,
        "noOfBedrooms": bedrooms,
        "floor": 2,
        "furnish": "semi",
        "facility": {}
    })
}

pub fn land_payload(fare: f64) -> Value {
    json!({
        "title": "Plot near ring road",
        "descriptionOfSpace": "Flat land, road access",
        "city": "Lalitpur",
        "chowk": "Satdobato",
        "municipality": "Lalitpur Metropolitan",
        "wardNo": 15,
        "totalArea": "4 aana",
        "roadType": "blacktopped",
        "propertyFace": "east",
        "roadAccess": "20 ft",
        "plotNumber": "PL-77",
        "fare": fare,
        "isFareNegotiable": true
    })
}
