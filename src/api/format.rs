use serde_json::{Map, Value};

use crate::database::store::Document;

/// Fields of a stored user that never leave the API
pub const USER_SECRET_FIELDS: [&str; 1] = ["password"];

/// Fields hidden from the user endpoints' profile view
pub const USER_PROFILE_HIDDEN: [&str; 2] = ["password", "roles"];

/// Convert a stored document into the public wire format
/// { _id, ...body, createdAt, updatedAt }
pub fn document_to_api_value(document: &Document) -> Value {
    document_without(document, &[])
}

/// Wire format with some body fields removed
pub fn document_without(document: &Document, exclude: &[&str]) -> Value {
    let mut obj = Map::with_capacity(document.body.len() + 3);
    obj.insert("_id".into(), Value::String(document.id.to_string()));
    for (key, value) in &document.body {
        if !exclude.contains(&key.as_str()) {
            obj.insert(key.clone(), value.clone());
        }
    }
    obj.insert("createdAt".into(), timestamp(document.created_at));
    obj.insert("updatedAt".into(), timestamp(document.updated_at));
    Value::Object(obj)
}

/// A user as returned by the auth and admin endpoints (no password hash)
pub fn user_profile(document: &Document) -> Value {
    document_without(document, &USER_SECRET_FIELDS)
}

/// The owner block embedded in admin listing views
pub fn owner_summary(document: &Document) -> Value {
    project(document, &["name", "email", "phoneNumber", "userAvatarUrl", "roles", "isVerified", "isEmailVerified"])
}

/// `_id` plus the listed body fields, skipping absent ones
pub fn project(document: &Document, fields: &[&str]) -> Value {
    let mut obj = Map::with_capacity(fields.len() + 1);
    obj.insert("_id".into(), Value::String(document.id.to_string()));
    for field in fields {
        match *field {
            "createdAt" => {
                obj.insert("createdAt".into(), timestamp(document.created_at));
            }
            name => {
                if let Some(value) = document.body.get(name) {
                    obj.insert(name.to_string(), value.clone());
                }
            }
        }
    }
    Value::Object(obj)
}

fn timestamp(at: chrono::DateTime<chrono::Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}
