// handlers/elevated/mod.rs - Admin-only endpoints
//
// Routed behind `jwt_auth_middleware` plus `require_roles(Role::ADMINS)`.

pub mod admin;
