// handlers/public/mod.rs - Endpoints that need no access token
//
// Token acquisition, the read side of every listing collection, the unified
// search feed and avatar upload URLs (issued before an account exists).

pub mod auth;
pub mod health;
pub mod listings;
pub mod search;
pub mod users;
