use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{default_true, normalize_opt, normalize_text, serialize_number, validate_urls, Facility};
use super::{Listing, Model};
use crate::database::store::Collection;
use crate::types::{Country, GenderPreference, ListingType, SpaceCategory, SpaceType};

/// A single rentable room
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub user_id: Uuid,
    #[serde(default)]
    pub country: Country,
    #[validate(length(min = 1, message = "District is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Chowk name is required"))]
    pub chowk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_number: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_urls"))]
    pub space_images_url: Vec<String>,
    #[serde(default)]
    pub facility: Facility,
    #[serde(default)]
    pub gender_preference: GenderPreference,
    #[serde(default = "default_true")]
    pub is_space_provider_living: bool,
    #[validate(length(min = 1, message = "Description of room is required"))]
    pub description_of_space: String,
    #[validate(length(min = 1, message = "Rules of living are required"))]
    pub rules_of_living: String,
    #[validate(range(min = 10, message = "Phone number must be 10 digits"))]
    pub phone_number: i64,
    #[serde(serialize_with = "serialize_number")]
    #[validate(range(min = 0.0, message = "Fare must be non-negative"))]
    pub fare: f64,
    #[validate(length(min = 1, message = "Near popular place name is required"))]
    pub near_popular_place: String,
    #[serde(default)]
    pub listing_type: ListingType,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub space_type: SpaceType,
    #[serde(default = "room_category")]
    pub space_categories: SpaceCategory,
    #[serde(default)]
    pub is_exclusive: bool,
}

fn room_category() -> SpaceCategory {
    SpaceCategory::Room
}

impl Model for Room {
    const COLLECTION: Collection = Collection::Rooms;
    const ENTITY: &'static str = "Room";

    fn normalize(&mut self) {
        normalize_text(&mut self.district);
        normalize_text(&mut self.city);
        normalize_text(&mut self.chowk);
        normalize_opt(&mut self.street);
        normalize_opt(&mut self.home_number);
        normalize_text(&mut self.description_of_space);
        normalize_text(&mut self.rules_of_living);
        normalize_text(&mut self.near_popular_place);
        self.facility.normalize();
        self.space_categories = SpaceCategory::Room;
    }
}

impl Listing for Room {
    const CATEGORY: SpaceCategory = SpaceCategory::Room;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_model;
    use serde_json::{json, Value};

    fn payload() -> Value {
        json!({
            "userId": Uuid::new_v4().to_string(),
            "district": " Kathmandu ",
            "city": "KATHMANDU",
            "chowk": "Thamel",
            "descriptionOfSpace": "Sunny Room",
            "rulesOfLiving": "No smoking",
            "phoneNumber": 9812345678u64,
            "fare": 5000,
            "nearPopularPlace": "Garden of Dreams"
        })
    }

    #[test]
    fn applies_defaults_and_normalises() {
        let room: Room = parse_model(payload()).unwrap();
        assert_eq!(room.district, "kathmandu");
        assert_eq!(room.city, "kathmandu");
        assert_eq!(room.country, Country::Nepal);
        assert_eq!(room.gender_preference, GenderPreference::ForAll);
        assert!(room.is_space_provider_living);
        assert!(room.is_available);
        assert!(!room.is_exclusive);
        assert!(!room.facility.wifi);
        assert_eq!(room.space_type, SpaceType::Commercial);

        let body = serde_json::to_value(&room).unwrap();
        assert_eq!(body["fare"], json!(5000));
        assert_eq!(body["spaceCategories"], "room");
        assert!(body.get("street").is_none());
    }

    #[test]
    fn negative_fare_is_rejected() {
        let mut p = payload();
        p["fare"] = json!(-5);
        let err = parse_model::<Room>(p).unwrap_err();
        assert_eq!(err.to_json()["errors"], json!(["fare: Fare must be non-negative"]));
    }

    #[test]
    fn missing_required_field_is_a_validation_error() {
        let mut p = payload();
        p.as_object_mut().unwrap().remove("chowk");
        let err = parse_model::<Room>(p).unwrap_err();
        assert_eq!(err.message(), "Validation Error");
        assert!(err.to_json()["errors"][0].as_str().unwrap().contains("chowk"));
    }

    #[test]
    fn whitespace_only_text_fails_after_trim() {
        let mut p = payload();
        p["city"] = json!("   ");
        assert!(parse_model::<Room>(p).is_err());
    }

    #[test]
    fn image_urls_must_parse() {
        let mut p = payload();
        p["spaceImagesUrl"] = json!(["https://cdn.example.com/room-images/a.jpg", "not a url"]);
        assert!(parse_model::<Room>(p).is_err());
    }

    #[test]
    fn unknown_gender_preference_is_rejected() {
        let mut p = payload();
        p["genderPreference"] = json!("everyone");
        assert!(parse_model::<Room>(p).is_err());
    }
}
