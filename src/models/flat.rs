use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{default_true, normalize_opt, normalize_text, serialize_number, validate_urls, Facility};
use super::{Listing, Model};
use crate::database::store::Collection;
use crate::types::{Country, Furnish, GenderPreference, ListingType, SpaceCategory, SpaceType};

/// A self-contained flat within a building
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Flat {
    pub user_id: Uuid,
    #[serde(default)]
    pub country: Country,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Chowk name is required"))]
    pub chowk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_urls"))]
    pub space_images_url: Vec<String>,
    pub facility: Facility,
    #[serde(default)]
    pub gender_preference: GenderPreference,
    #[serde(default = "default_true")]
    pub is_space_provider_living: bool,
    #[validate(length(min = 1, message = "Description of space is required"))]
    pub description_of_space: String,
    #[validate(length(min = 1, message = "Rules of living are required"))]
    pub rules_of_living: String,
    #[validate(range(min = 1, message = "Phone number must be positive"))]
    pub phone_number: i64,
    #[serde(serialize_with = "serialize_number")]
    #[validate(range(min = 0.0, message = "Fare must be non-negative"))]
    pub fare: f64,
    #[validate(length(min = 1, message = "Near popular place name is required"))]
    pub near_popular_place: String,
    #[serde(default)]
    pub listing_type: ListingType,
    #[validate(range(min = 1, message = "Must have at least one bedroom"))]
    pub no_of_bedrooms: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Bathrooms must be non-negative"))]
    pub no_of_bathrooms: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Kitchens must be non-negative"))]
    pub no_of_kitchens: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_of_parking_spaces: Option<String>,
    pub furnish: Furnish,
    #[validate(range(min = 0, message = "Floor must be non-negative"))]
    pub floor: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub space_type: SpaceType,
    #[serde(default = "flat_category")]
    pub space_categories: SpaceCategory,
}

fn flat_category() -> SpaceCategory {
    SpaceCategory::Flat
}

impl Model for Flat {
    const COLLECTION: Collection = Collection::Flats;
    const ENTITY: &'static str = "Flat";

    fn normalize(&mut self) {
        normalize_opt(&mut self.district);
        normalize_text(&mut self.city);
        normalize_text(&mut self.chowk);
        normalize_opt(&mut self.street);
        normalize_opt(&mut self.house_number);
        normalize_text(&mut self.description_of_space);
        normalize_text(&mut self.rules_of_living);
        normalize_text(&mut self.near_popular_place);
        self.facility.normalize();
        self.space_categories = SpaceCategory::Flat;
    }
}

impl Listing for Flat {
    const CATEGORY: SpaceCategory = SpaceCategory::Flat;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_model;
    use serde_json::json;

    #[test]
    fn flat_requires_facility_and_bedrooms() {
        let base = json!({
            "userId": Uuid::new_v4().to_string(),
            "city": "Lalitpur",
            "chowk": "Jhamsikhel",
            "facility": {"wifi": true},
            "descriptionOfSpace": "two bhk",
            "rulesOfLiving": "none",
            "phoneNumber": 9800000000u64,
            "fare": 25000,
            "nearPopularPlace": "Labim Mall",
            "noOfBedrooms": 2,
            "furnish": "semi",
            "floor": 3
        });
        let flat: Flat = parse_model(base.clone()).unwrap();
        assert!(flat.facility.wifi);
        assert!(!flat.facility.bed);
        assert_eq!(flat.no_of_bathrooms, 0);
        assert_eq!(flat.furnish, Furnish::Semi);

        let mut no_facility = base.clone();
        no_facility.as_object_mut().unwrap().remove("facility");
        assert!(parse_model::<Flat>(no_facility).is_err());

        let mut studio = base;
        studio["noOfBedrooms"] = json!(0);
        let err = parse_model::<Flat>(studio).unwrap_err();
        assert_eq!(err.to_json()["errors"], json!(["noOfBedrooms: Must have at least one bedroom"]));
    }
}
