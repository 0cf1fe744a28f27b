use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{
    default_true, normalize_opt, normalize_text, serialize_number, trim_opt, validate_urls, HouseFacilities,
    NearByLocation,
};
use super::{Listing, Model};
use crate::database::store::Collection;
use crate::types::{Country, Furnish, ListingType, SpaceCategory, SpaceType};

/// A whole house for rent or sale
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct House {
    pub user_id: Uuid,
    #[serde(default)]
    pub country: Country,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description of space is required"))]
    pub description_of_space: String,
    #[serde(default)]
    #[validate(custom(function = "validate_urls"))]
    pub space_images_url: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Invalid video url"))]
    pub video_url: Option<String>,
    #[validate(range(min = 1, message = "Phone number must be positive"))]
    pub phone_number: i64,
    #[serde(default)]
    pub listing_type: ListingType,
    #[serde(default)]
    pub space_type: SpaceType,
    #[serde(default = "house_category")]
    pub space_categories: SpaceCategory,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Chowk name is required"))]
    pub chowk: String,
    #[validate(length(min = 1, message = "Municipality is required"))]
    pub municipality: String,
    #[validate(range(min = 1, message = "Ward number must be positive"))]
    pub ward_no: i64,
    #[validate(length(min = 1, message = "Total area is required"))]
    pub total_area: String,
    #[validate(length(min = 1, message = "Built-up area is required"))]
    pub build_up_area: String,
    #[validate(range(min = 0, message = "Bedrooms must be non-negative"))]
    pub no_of_bedrooms: i64,
    #[validate(range(min = 0, message = "Bathrooms must be non-negative"))]
    pub no_of_bathrooms: i64,
    #[validate(range(min = 0, message = "Kitchens must be non-negative"))]
    pub no_of_kitchens: i64,
    pub build_year: i32,
    #[serde(default)]
    pub furnish: Furnish,
    #[validate(range(min = 0, message = "Floors must be non-negative"))]
    pub no_of_floors: i64,
    #[validate(range(min = 0, message = "Living rooms must be non-negative"))]
    pub no_of_living_rooms: i64,
    #[validate(range(min = 0, message = "Parking spaces must be non-negative"))]
    pub no_of_parking_spaces: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[validate(length(min = 1, message = "Road type is required"))]
    pub road_type: String,
    #[validate(length(min = 1, message = "Property face is required"))]
    pub property_face: String,
    #[validate(length(min = 1, message = "Road access is required"))]
    pub road_access: String,
    #[validate(length(min = 1, message = "Plot number is required"))]
    pub plot_number: String,
    #[serde(default)]
    pub facilities: HouseFacilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub near_by_location: Option<NearByLocation>,
    #[serde(serialize_with = "serialize_number")]
    #[validate(range(min = 0.0, message = "Fare must be non-negative"))]
    pub fare: f64,
    pub is_fare_negotiable: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_exclusive: bool,
}

fn house_category() -> SpaceCategory {
    SpaceCategory::House
}

impl Model for House {
    const COLLECTION: Collection = Collection::Houses;
    const ENTITY: &'static str = "House";

    fn normalize(&mut self) {
        normalize_text(&mut self.title);
        normalize_text(&mut self.description_of_space);
        trim_opt(&mut self.video_url);
        normalize_text(&mut self.city);
        normalize_text(&mut self.chowk);
        normalize_text(&mut self.municipality);
        normalize_text(&mut self.total_area);
        normalize_text(&mut self.build_up_area);
        normalize_opt(&mut self.dimension);
        normalize_text(&mut self.road_type);
        normalize_text(&mut self.property_face);
        normalize_text(&mut self.road_access);
        self.plot_number = self.plot_number.trim().to_string();
        if let Some(near) = &mut self.near_by_location {
            near.normalize();
        }
        self.space_categories = SpaceCategory::House;
    }
}

impl Listing for House {
    const CATEGORY: SpaceCategory = SpaceCategory::House;
}
