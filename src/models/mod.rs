// Entity schemas: serde shapes with defaults, validator rules and normalisation.
//
// Every write goes through `parse_model`: decode (defaults applied, unknown
// enum values rejected) -> normalize (trim / lowercase) -> validate.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::database::store::Collection;
use crate::error::ApiError;
use crate::types::SpaceCategory;

pub mod address;
pub mod apartment;
pub mod common;
pub mod flat;
pub mod house;
pub mod land;
pub mod room;
pub mod user;

pub use address::Address;
pub use apartment::Apartment;
pub use flat::Flat;
pub use house::House;
pub use land::Land;
pub use room::Room;
pub use user::{LoginRequest, NewUser, User, UserUpdate};

/// Keys clients may never write directly
pub const PROTECTED_KEYS: [&str; 6] = ["_id", "id", "userId", "createdAt", "updatedAt", "__v"];

/// A validated document type stored in one collection
pub trait Model: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Capitalised entity name used in messages
    const ENTITY: &'static str;

    fn normalize(&mut self);
}

/// A listing kind with its own collection and public routes
pub trait Listing: Model {
    const CATEGORY: SpaceCategory;
}

/// Decode, normalise and validate a JSON payload
pub fn parse_model<M: Model>(payload: Value) -> Result<M, ApiError> {
    let mut model: M = serde_json::from_value(payload)?;
    model.normalize();
    model.validate()?;
    Ok(model)
}

/// Serialise a model into a storable document body
pub fn to_body<M: Serialize>(model: &M) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(model) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::internal_server_error("Internal Server Error")),
        Err(e) => Err(ApiError::internal("Failed to serialise document", e)),
    }
}

/// Payload as an object with the owner injected; anything else is a validation error
pub fn with_owner(payload: Value, owner: uuid::Uuid) -> Result<Value, ApiError> {
    let Value::Object(mut map) = payload else {
        return Err(ApiError::validation_error(vec!["body: Expected object".to_string()]));
    };
    for key in PROTECTED_KEYS {
        map.remove(key);
    }
    map.insert("userId".to_string(), Value::String(owner.to_string()));
    Ok(Value::Object(map))
}

/// Shallow merge of a partial update onto a stored body.
/// Protected keys are ignored and `null` removes a key.
pub fn merge_patch(existing: &Map<String, Value>, patch: Value) -> Result<Value, ApiError> {
    let Value::Object(patch) = patch else {
        return Err(ApiError::validation_error(vec!["body: Expected object".to_string()]));
    };
    let mut merged = existing.clone();
    for (key, value) in patch {
        if PROTECTED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if value.is_null() {
            merged.remove(&key);
        } else {
            merged.insert(key, value);
        }
    }
    Ok(Value::Object(merged))
}
