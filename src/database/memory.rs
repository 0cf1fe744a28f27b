use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::store::{Collection, Document, DocumentStore};
use crate::filter::{Filter, FindQuery};

/// Process-local `DocumentStore` used in development without a database and by the tests.
/// Documents are kept in insertion order, so stable sorts behave like the SQL tie-breaks.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with explicit timestamps; lets tests age documents
    pub async fn insert_document(&self, collection: Collection, document: Document) -> Result<(), DatabaseError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        check_unique(collection, docs, &document.body, None)?;
        docs.push(document);
        Ok(())
    }
}

fn check_unique(
    collection: Collection,
    docs: &[Document],
    body: &Map<String, Value>,
    skip_id: Option<Uuid>,
) -> Result<(), DatabaseError> {
    for field in collection.unique_fields() {
        let Some(value) = body.get(*field).filter(|v| !v.is_null()) else {
            continue;
        };
        let clash = docs
            .iter()
            .filter(|d| Some(d.id) != skip_id)
            .any(|d| d.body.get(*field) == Some(value));
        if clash {
            return Err(DatabaseError::Duplicate { field: field.to_string() });
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> Result<Document, DatabaseError> {
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body,
        };
        self.insert_document(collection, document.clone()).await?;
        Ok(document)
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn find(&self, collection: Collection, query: &FindQuery) -> Result<Vec<Document>, DatabaseError> {
        // Validates the filter the same way the SQL backend would
        query.filter.to_sql()?;
        query.tail_sql()?;
        let matched: Vec<Document> = {
            let collections = self.collections.read().await;
            collections
                .get(&collection)
                .map(|docs| docs.iter().filter(|d| query.filter.matches(d)).cloned().collect())
                .unwrap_or_default()
        };
        Ok(query.window(matched))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError> {
        filter.to_sql()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }

    async fn replace(&self, collection: Collection, id: Uuid, body: Map<String, Value>) -> Result<Option<Document>, DatabaseError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if !docs.iter().any(|d| d.id == id) {
            return Ok(None);
        }
        check_unique(collection, docs, &body, Some(id))?;
        let Some(doc) = docs.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        doc.body = body;
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(docs.iter().position(|d| d.id == id).map(|index| docs.remove(index)))
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError> {
        filter.to_sql()?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok((before - docs.len()) as u64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
