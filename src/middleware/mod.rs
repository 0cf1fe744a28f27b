pub mod auth;
pub mod extract;
pub mod rate_limit;
pub mod response;
pub mod roles;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use extract::{IdPath, JsonBody, QueryParams};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
pub use response::{ApiResponse, ApiResult};
pub use roles::require_roles;
