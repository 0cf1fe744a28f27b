use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::{Condition, SqlParam};
use crate::database::store::Document;

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Build `cond AND cond ...` with `$n` placeholders numbered after `starting_param_index`
    pub fn generate(conditions: &[Condition], starting_param_index: usize) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build_all(conditions, " AND ")?;
        Ok((clause, filter_where.param_values))
    }

    fn build_all(&mut self, conditions: &[Condition], joiner: &str) -> Result<String, FilterError> {
        if conditions.is_empty() {
            return Ok("1=1".to_string());
        }
        let mut parts = Vec::with_capacity(conditions.len());
        for condition in conditions {
            parts.push(self.build_condition(condition)?);
        }
        Ok(parts.join(joiner))
    }

    fn build_condition(&mut self, condition: &Condition) -> Result<String, FilterError> {
        match condition {
            Condition::Eq { field, value } => {
                Self::validate_field(field)?;
                let mut probe = Map::new();
                probe.insert(field.clone(), value.clone());
                let p = self.push(SqlParam::Json(Value::Object(probe)));
                Ok(format!("doc @> {}", p))
            }
            Condition::Gte { field, value } => {
                Self::validate_field(field)?;
                let p = self.push(SqlParam::Float(*value));
                Ok(format!("(doc->>'{}')::float8 >= {}", field, p))
            }
            Condition::Lte { field, value } => {
                Self::validate_field(field)?;
                let p = self.push(SqlParam::Float(*value));
                Ok(format!("(doc->>'{}')::float8 <= {}", field, p))
            }
            Condition::Contains { field, needle } => {
                Self::validate_field(field)?;
                let p = self.push(SqlParam::Text(format!("%{}%", escape_like(needle))));
                Ok(format!("doc->>'{}' ILIKE {}", field, p))
            }
            Condition::CreatedAfter(since) => {
                let p = self.push(SqlParam::Timestamp(*since));
                Ok(format!("\"created_at\" >= {}", p))
            }
            Condition::IdIn(ids) => {
                let p = self.push(SqlParam::Uuids(ids.clone()));
                Ok(format!("\"id\" = ANY({})", p))
            }
            Condition::Or(alternatives) => {
                if alternatives.is_empty() {
                    return Err(FilterError::InvalidWhereClause("$or requires at least one condition".to_string()));
                }
                let inner = self.build_all(alternatives, " OR ")?;
                Ok(format!("({})", inner))
            }
        }
    }

    fn push(&mut self, param: SqlParam) -> String {
        self.param_values.push(param);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    /// Field names are inlined into SQL, so only plain identifiers are accepted
    fn validate_field(field: &str) -> Result<(), FilterError> {
        let valid = !field.is_empty()
            && field.len() <= 63
            && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !field.starts_with(|c: char| c.is_ascii_digit());
        if valid {
            Ok(())
        } else {
            Err(FilterError::InvalidField(field.to_string()))
        }
    }

    pub fn matches(conditions: &[Condition], document: &Document) -> bool {
        conditions.iter().all(|c| Self::matches_condition(c, document))
    }

    fn matches_condition(condition: &Condition, document: &Document) -> bool {
        match condition {
            Condition::Eq { field, value } => match (document.body.get(field), value) {
                (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
                (Some(actual), expected) => actual == expected,
                (None, _) => false,
            },
            Condition::Gte { field, value } => document.number(field).is_some_and(|n| n >= *value),
            Condition::Lte { field, value } => document.number(field).is_some_and(|n| n <= *value),
            Condition::Contains { field, needle } => document
                .string(field)
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            Condition::CreatedAfter(since) => document.created_at >= *since,
            Condition::IdIn(ids) => ids.contains(&document.id),
            Condition::Or(alternatives) => alternatives.iter().any(|c| Self::matches_condition(c, document)),
        }
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
