use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::manager::DatabaseError;
use crate::filter::{Filter, FindQuery};

/// Document collections persisted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Addresses,
    Rooms,
    Flats,
    Houses,
    Lands,
    Apartments,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Users,
        Collection::Addresses,
        Collection::Rooms,
        Collection::Flats,
        Collection::Houses,
        Collection::Lands,
        Collection::Apartments,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Addresses => "addresses",
            Collection::Rooms => "rooms",
            Collection::Flats => "flats",
            Collection::Houses => "houses",
            Collection::Lands => "lands",
            Collection::Apartments => "apartments",
        }
    }

    /// Top-level document fields backed by a unique index
    pub fn unique_fields(self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["email", "phoneNumber"],
            Collection::Addresses => &["userId"],
            _ => &[],
        }
    }

    /// Name of the unique index on `field`, as created by the migrations
    pub fn unique_index(self, field: &str) -> String {
        format!("{}_{}_uniq", self.table(), field.to_ascii_lowercase())
    }
}

/// A stored document: system columns plus the JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn string(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.body.get(field).and_then(Value::as_f64)
    }

    /// Owning user of a listing or address
    pub fn owner_id(&self) -> Option<Uuid> {
        self.string("userId").and_then(|s| Uuid::parse_str(s).ok())
    }

    /// Stored photo URLs of a listing
    pub fn image_urls(&self) -> Vec<String> {
        self.body
            .get("spaceImagesUrl")
            .and_then(Value::as_array)
            .map(|urls| urls.iter().filter_map(|u| u.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    }
}

/// Persistence boundary for document collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> Result<Document, DatabaseError>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, DatabaseError>;

    async fn find(&self, collection: Collection, query: &FindQuery) -> Result<Vec<Document>, DatabaseError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError>;

    /// Replace the body of an existing document; `None` if it does not exist
    async fn replace(&self, collection: Collection, id: Uuid, body: Map<String, Value>) -> Result<Option<Document>, DatabaseError>;

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError>;

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Fetch by id or fail with a 404-mapped error naming the entity
    async fn get(&self, collection: Collection, id: Uuid, entity: &str) -> Result<Document, DatabaseError> {
        self.find_by_id(collection, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", entity)))
    }
}
