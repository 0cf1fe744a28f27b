use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::store::{Collection, Document, DocumentStore};
use crate::filter::{Filter, FindQuery, SqlParam};

type DocumentRow = (Uuid, Value, DateTime<Utc>, DateTime<Utc>);

const COLUMNS: &str = "id, doc, created_at, updated_at";

/// `DocumentStore` over one JSONB table per collection
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_document(row: DocumentRow) -> Result<Document, DatabaseError> {
        let (id, doc, created_at, updated_at) = row;
        match doc {
            Value::Object(body) => Ok(Document { id, created_at, updated_at, body }),
            other => Err(DatabaseError::QueryError(format!(
                "document {} has non-object body: {}",
                id, other
            ))),
        }
    }
}

fn bind_params<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        q = match p {
            SqlParam::Json(v) => q.bind(v.clone()),
            SqlParam::Float(f) => q.bind(*f),
            SqlParam::Text(s) => q.bind(s.clone()),
            SqlParam::Timestamp(t) => q.bind(*t),
            SqlParam::Uuids(ids) => q.bind(ids.clone()),
        };
    }
    q
}

/// Translate unique-index violations into `Duplicate { field }`
fn map_write_error(collection: Collection, err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            let field = collection
                .unique_fields()
                .iter()
                .find(|f| collection.unique_index(f) == constraint)
                .map(|f| f.to_string())
                .unwrap_or(constraint);
            return DatabaseError::Duplicate { field };
        }
    }
    DatabaseError::Sqlx(err)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> Result<Document, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (id, doc, created_at, updated_at) VALUES ($1, $2, $3, $3) RETURNING {}",
            collection.table(),
            COLUMNS
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(Value::Object(body))
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, e))?;
        Self::into_document(row)
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, collection.table());
        sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Self::into_document)
            .transpose()
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, DatabaseError> {
        let found = self.find(collection, &FindQuery::new(filter.clone()).limit(1)).await?;
        Ok(found.into_iter().next())
    }

    async fn find(&self, collection: Collection, query: &FindQuery) -> Result<Vec<Document>, DatabaseError> {
        let where_sql = query.filter.to_sql()?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} {}",
            COLUMNS,
            collection.table(),
            where_sql.query,
            query.tail_sql()?
        );
        tracing::debug!("find {}: {}", collection.table(), sql);
        let rows = bind_params(sqlx::query_as::<_, DocumentRow>(&sql), &where_sql.params)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::into_document).collect()
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError> {
        let where_sql = filter.to_sql()?;
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {}", collection.table(), where_sql.query);
        let (count,): (i64,) = bind_params(sqlx::query_as::<_, (i64,)>(&sql), &where_sql.params)
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn replace(&self, collection: Collection, id: Uuid, body: Map<String, Value>) -> Result<Option<Document>, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET doc = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            collection.table(),
            COLUMNS
        );
        sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .bind(Value::Object(body))
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, e))?
            .map(Self::into_document)
            .transpose()
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {}", collection.table(), COLUMNS);
        sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Self::into_document)
            .transpose()
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError> {
        let where_sql = filter.to_sql()?;
        let sql = format!("DELETE FROM {} WHERE {} RETURNING id", collection.table(), where_sql.query);
        let deleted = bind_params(sqlx::query_as::<_, (Uuid,)>(&sql), &where_sql.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(deleted.len() as u64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
