use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single predicate over a stored document. Conditions in a filter are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the JSON value (string, number or bool)
    Eq { field: String, value: Value },
    /// Numeric field is at least `value`
    Gte { field: String, value: f64 },
    /// Numeric field is at most `value`
    Lte { field: String, value: f64 },
    /// Case-insensitive substring match on a string field
    Contains { field: String, needle: String },
    /// Document was created at or after the instant
    CreatedAfter(DateTime<Utc>),
    IdIn(Vec<Uuid>),
    /// At least one of the nested conditions holds
    Or(Vec<Condition>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortField {
    #[serde(rename = "fare")]
    Fare,
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn newest_first() -> Self {
        Self::new(SortField::CreatedAt, SortDirection::Desc)
    }
}

/// Positional parameter produced while compiling a filter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Json(Value),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuids(Vec<Uuid>),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
