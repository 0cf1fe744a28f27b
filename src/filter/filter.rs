use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{Condition, Sort, SqlResult};
use crate::database::store::Document;

/// AND-ed set of conditions over one collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq { field: field.to_string(), value: value.into() });
        self
    }

    pub fn gte(mut self, field: &str, value: f64) -> Self {
        self.conditions.push(Condition::Gte { field: field.to_string(), value });
        self
    }

    pub fn lte(mut self, field: &str, value: f64) -> Self {
        self.conditions.push(Condition::Lte { field: field.to_string(), value });
        self
    }

    pub fn contains(mut self, field: &str, needle: &str) -> Self {
        self.conditions.push(Condition::Contains { field: field.to_string(), needle: needle.to_string() });
        self
    }

    pub fn created_after(mut self, since: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::CreatedAfter(since));
        self
    }

    pub fn id_in(mut self, ids: Vec<Uuid>) -> Self {
        self.conditions.push(Condition::IdIn(ids));
        self
    }

    /// Case-insensitive substring match against any of `fields`
    pub fn contains_any(mut self, fields: &[&str], needle: &str) -> Self {
        let alternatives = fields
            .iter()
            .map(|field| Condition::Contains { field: field.to_string(), needle: needle.to_string() })
            .collect();
        self.conditions.push(Condition::Or(alternatives));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Compile into a parameterised WHERE clause starting at `$1`
    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (query, params) = FilterWhere::generate(&self.conditions, 0)?;
        Ok(SqlResult { query, params })
    }

    /// Evaluate against an in-memory document with the same semantics as the SQL form
    pub fn matches(&self, document: &Document) -> bool {
        FilterWhere::matches(&self.conditions, document)
    }
}

/// Filter plus ordering and a skip/limit window
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        Self { filter, ..Default::default() }
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// ORDER BY / LIMIT / OFFSET tail for the SQL backend
    pub fn tail_sql(&self) -> Result<String, FilterError> {
        if self.limit == Some(0) {
            return Err(FilterError::InvalidLimit("Limit must be positive".to_string()));
        }
        let mut sql = FilterOrder::generate(self.sort.as_ref());
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if self.skip > 0 {
            sql.push_str(&format!(" OFFSET {}", self.skip));
        }
        Ok(sql)
    }

    /// Apply ordering and the window to an already-filtered set
    pub fn window(&self, mut documents: Vec<Document>) -> Vec<Document> {
        if let Some(sort) = &self.sort {
            documents.sort_by(|a, b| FilterOrder::compare(sort, a, b));
        }
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let iter = documents.into_iter().skip(skip);
        match self.limit {
            Some(limit) => iter.take(usize::try_from(limit).unwrap_or(usize::MAX)).collect(),
            None => iter.collect(),
        }
    }
}
