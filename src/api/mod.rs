pub mod format;
pub mod pagination;

pub use format::{document_to_api_value, document_without, owner_summary, user_profile};
pub use pagination::{AdminPagination, Page, PageRequest};
