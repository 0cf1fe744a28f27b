use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// In-place trim + lowercase, the storage form of free-text location fields
pub fn normalize_text(value: &mut String) {
    *value = value.trim().to_lowercase();
}

pub fn normalize_opt(value: &mut Option<String>) {
    if let Some(v) = value {
        normalize_text(v);
    }
}

pub fn trim_opt(value: &mut Option<String>) {
    if let Some(v) = value {
        *v = v.trim().to_string();
    }
}

pub fn default_true() -> bool {
    true
}

/// Whole numbers go out as JSON integers so clients see the fare they sent
pub fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn validation_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

pub fn validate_urls(urls: &Vec<String>) -> Result<(), ValidationError> {
    match urls.iter().find(|u| url::Url::parse(u).is_err()) {
        Some(bad) => Err(validation_error("url", format!("Invalid url: {}", bad))),
        None => Ok(()),
    }
}

/// `NNNNN` or `NNNNN-NNNN`
pub fn validate_zip_code(code: &str) -> Result<(), ValidationError> {
    let digits = |s: &str, n: usize| s.len() == n && s.bytes().all(|b| b.is_ascii_digit());
    let valid = match code.split_once('-') {
        None => digits(code, 5),
        Some((head, tail)) => digits(head, 5) && digits(tail, 4),
    };
    if valid {
        Ok(())
    } else {
        Err(validation_error("zip_code", "Invalid ZIP code format".to_string()))
    }
}

/// In-unit amenities of rooms, flats and apartments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Facility {
    pub water: bool,
    pub table: bool,
    pub chair: bool,
    pub clothes_hanger: bool,
    pub bed: bool,
    pub fan: bool,
    pub wifi: bool,
    pub parking: Option<String>,
}

impl Facility {
    pub fn normalize(&mut self) {
        trim_opt(&mut self.parking);
    }
}

/// Building amenities of a house
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseFacilities {
    pub security_staff: bool,
    pub elevator: bool,
    pub maintenances: bool,
    pub kids_play_ground: bool,
    pub electricity_backup: bool,
    pub cafeteria: bool,
    pub washing_machine: bool,
    #[serde(rename = "TVCable")]
    pub tv_cable: bool,
    pub swimming_pool: bool,
    pub modular_kitchen: bool,
    pub microwave: bool,
    pub gym: bool,
    pub cctv: bool,
    pub garden: bool,
    pub fencing: bool,
    pub balcony: bool,
    pub ac: bool,
    pub water_tank: bool,
    pub water_supply: bool,
    pub drainage: bool,
    pub jacuzzi: bool,
    pub garage: bool,
    pub lawn: bool,
}

/// Landmarks around a house or land parcel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearByLocation {
    pub landmark: Option<String>,
    pub hospital: Option<String>,
    pub school: Option<String>,
    pub park: Option<String>,
    #[validate(length(min = 1, message = "Market is required"))]
    pub market: String,
    pub police_station: Option<String>,
    pub fire_station: Option<String>,
    pub bank: Option<String>,
    pub post_office: Option<String>,
    pub atm: Option<String>,
    pub library: Option<String>,
    pub pharmacy: Option<String>,
    pub ward_office: Option<String>,
    pub restaurant: Option<String>,
    pub bus_station: Option<String>,
    pub cinema_hall: Option<String>,
}

impl NearByLocation {
    pub fn normalize(&mut self) {
        for field in [
            &mut self.landmark,
            &mut self.hospital,
            &mut self.park,
            &mut self.police_station,
            &mut self.fire_station,
            &mut self.bank,
            &mut self.library,
            &mut self.pharmacy,
            &mut self.ward_office,
            &mut self.restaurant,
            &mut self.bus_station,
            &mut self.cinema_hall,
        ] {
            normalize_opt(field);
        }
        // School names keep their acronyms
        if let Some(school) = &mut self.school {
            *school = school.trim().to_uppercase();
        }
        self.market = self.market.trim().to_string();
        trim_opt(&mut self.post_office);
        trim_opt(&mut self.atm);
    }
}
