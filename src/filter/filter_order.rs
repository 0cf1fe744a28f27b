use std::cmp::Ordering;

use super::types::{Sort, SortDirection, SortField};
use crate::database::store::Document;

pub struct FilterOrder;

impl FilterOrder {
    /// ORDER BY clause; created_at/id break ties so paging is deterministic
    pub fn generate(sort: Option<&Sort>) -> String {
        match sort {
            None => "ORDER BY \"created_at\" ASC, \"id\" ASC".to_string(),
            Some(sort) => {
                let dir = sort.direction.to_sql();
                match sort.field {
                    SortField::Fare => format!(
                        "ORDER BY (doc->>'fare')::float8 {dir} NULLS LAST, \"created_at\" ASC, \"id\" ASC"
                    ),
                    SortField::CreatedAt => format!("ORDER BY \"created_at\" {dir}, \"id\" ASC"),
                }
            }
        }
    }

    /// Value comparator shared by the memory store and the search merge.
    /// Used with a stable sort, equal keys keep their incoming order.
    pub fn compare(sort: &Sort, a: &Document, b: &Document) -> Ordering {
        let ordering = match sort.field {
            SortField::Fare => {
                let fa = a.number("fare").unwrap_or(f64::NAN);
                let fb = b.number("fare").unwrap_or(f64::NAN);
                fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
            }
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}
