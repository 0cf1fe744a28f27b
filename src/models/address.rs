use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{default_true, normalize_opt, normalize_text, validate_zip_code};
use super::Model;
use crate::database::store::Collection;

/// Postal address; at most one per user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub user_id: Uuid,
    #[serde(default = "default_country")]
    #[validate(length(min = 2, max = 50, message = "Country must be between 2 and 50 characters"))]
    pub country: String,
    #[validate(length(min = 1, max = 50, message = "State must be between 1 and 50 characters"))]
    pub state: String,
    #[validate(length(min = 2, max = 50, message = "City must be between 2 and 50 characters"))]
    pub city: String,
    #[validate(length(min = 2, max = 50, message = "Chowk must be between 2 and 50 characters"))]
    pub chowk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, max = 100, message = "Street must be between 5 and 100 characters"))]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "House number must be between 1 and 50 characters"))]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_zip_code"))]
    pub zip_code: Option<String>,
    #[serde(default = "default_true")]
    pub is_default: bool,
}

fn default_country() -> String {
    "nepal".to_string()
}

impl Model for Address {
    const COLLECTION: Collection = Collection::Addresses;
    const ENTITY: &'static str = "Address";

    fn normalize(&mut self) {
        normalize_text(&mut self.country);
        normalize_text(&mut self.state);
        normalize_text(&mut self.city);
        normalize_text(&mut self.chowk);
        normalize_opt(&mut self.street);
        normalize_opt(&mut self.house_number);
        if let Some(zip) = &mut self.zip_code {
            *zip = zip.trim().to_string();
        }
    }
}
