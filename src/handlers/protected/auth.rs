// handlers/protected/auth.rs - POST /api/v1/auth/logout

use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::app::AppState;
use crate::handlers::public::auth::refresh_cookie;
use crate::middleware::{ApiResponse, AuthUser};

/// Expire the refresh cookie. Access tokens simply run out.
pub async fn logout(State(state): State<AppState>, user: AuthUser, jar: CookieJar) -> (CookieJar, ApiResponse<Value>) {
    let mut expired = refresh_cookie(&state.config.security, String::new());
    expired.set_max_age(time::Duration::ZERO);
    tracing::info!("User {} logged out", user.user_id);
    (jar.add(expired), ApiResponse::success("Logout successful", Value::Null))
}
