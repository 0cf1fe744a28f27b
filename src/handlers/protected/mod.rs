// handlers/protected/mod.rs - Endpoints behind `jwt_auth_middleware`
//
// Every handler here receives the `AuthUser` injected by the middleware.
// Listing writes additionally pass a `require_roles` gate configured in
// `app.rs`; owner-or-admin checks happen in the services.

pub mod addresses;
pub mod auth;
pub mod images;
pub mod listings;
pub mod users;
