pub mod address_service;
pub mod admin_service;
pub mod auth_service;
pub mod image_service;
pub mod listing_service;
pub mod search_service;
pub mod user_service;
