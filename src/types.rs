/// Shared enums used across models, filters and authorization

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::database::store::Collection;

/// Account roles carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    User,
    SpaceProvider,
    SpaceBroker,
    Guest,
}

impl Role {
    /// Roles allowed to create and manage listings
    pub const LISTING_WRITERS: &'static [Role] = &[Role::SpaceProvider, Role::SpaceBroker];
    /// Roles allowed to request listing image upload URLs
    pub const LISTING_UPLOADERS: &'static [Role] = &[Role::Admin, Role::SpaceProvider, Role::SpaceBroker];
    pub const ADMINS: &'static [Role] = &[Role::Admin, Role::SuperAdmin];

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    #[default]
    Nepal,
    India,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GenderPreference {
    GirlsOnly,
    #[default]
    ForAll,
    BoysOnly,
    FamilyOnly,
    FamilyAndGirlsOnly,
    WorkingProfessionalAndGirlsAndFamilyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[default]
    Rent,
    Sale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SpaceType {
    #[default]
    Commercial,
    Residential,
    SemiResidential,
    MixedUse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Furnish {
    #[default]
    Full,
    Semi,
    Part,
    None,
}

/// Listing kinds; doubles as the `spaceCategories` value on every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceCategory {
    Room,
    Apartment,
    House,
    Flat,
    Land,
}

impl SpaceCategory {
    /// Kinds merged by the unified search feed
    pub const SEARCHABLE: [SpaceCategory; 4] = [
        SpaceCategory::Room,
        SpaceCategory::Flat,
        SpaceCategory::House,
        SpaceCategory::Land,
    ];

    pub const ALL: [SpaceCategory; 5] = [
        SpaceCategory::Room,
        SpaceCategory::Flat,
        SpaceCategory::House,
        SpaceCategory::Land,
        SpaceCategory::Apartment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpaceCategory::Room => "room",
            SpaceCategory::Apartment => "apartment",
            SpaceCategory::House => "house",
            SpaceCategory::Flat => "flat",
            SpaceCategory::Land => "land",
        }
    }

    /// Capitalised name used in response messages ("Room created successfully")
    pub fn label(self) -> &'static str {
        match self {
            SpaceCategory::Room => "Room",
            SpaceCategory::Apartment => "Apartment",
            SpaceCategory::House => "House",
            SpaceCategory::Flat => "Flat",
            SpaceCategory::Land => "Land",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            SpaceCategory::Room => "rooms",
            SpaceCategory::Apartment => "apartments",
            SpaceCategory::House => "houses",
            SpaceCategory::Flat => "flats",
            SpaceCategory::Land => "lands",
        }
    }

    pub fn collection(self) -> Collection {
        match self {
            SpaceCategory::Room => Collection::Rooms,
            SpaceCategory::Apartment => Collection::Apartments,
            SpaceCategory::House => Collection::Houses,
            SpaceCategory::Flat => Collection::Flats,
            SpaceCategory::Land => Collection::Lands,
        }
    }

    /// Object storage folder for listing photos
    pub fn image_folder(self) -> String {
        format!("{}-images", self.as_str())
    }

    pub fn has_bedrooms(self) -> bool {
        matches!(self, SpaceCategory::Flat | SpaceCategory::House | SpaceCategory::Apartment)
    }
}

impl fmt::Display for SpaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
