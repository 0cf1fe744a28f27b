// handlers/public/auth.rs - POST /api/v1/auth/{signup,login,refresh}

use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::models::{LoginRequest, NewUser};
use crate::services::auth_service::{self, Session};

/// Name of the HTTP-only cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "jwtToken";

/// Cross-site, HTTP-only refresh cookie living as long as the token
pub fn refresh_cookie(security: &SecurityConfig, token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(security.secure_cookies)
        .same_site(SameSite::None)
        .max_age(time::Duration::seconds(security.refresh_token_ttl_secs))
        .build()
}

fn session_body(session: Session) -> (String, Value) {
    let body = json!({ "accessToken": session.access_token, "user": session.user });
    (session.refresh_token, body)
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(new_user): JsonBody<NewUser>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let session = auth_service::signup(state.store.as_ref(), &state.config.security, new_user).await?;
    let (refresh_token, body) = session_body(session);
    let jar = jar.add(refresh_cookie(&state.config.security, refresh_token));
    Ok((jar, ApiResponse::created("User created successfully", body)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let session = auth_service::login(state.store.as_ref(), &state.config.security, request).await?;
    let (refresh_token, body) = session_body(session);
    let jar = jar.add(refresh_cookie(&state.config.security, refresh_token));
    Ok((jar, ApiResponse::success("Login successful", body)))
}

pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Value> {
    let cookie = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    let access_token = auth_service::refresh(state.store.as_ref(), &state.config.security, cookie.as_deref()).await?;
    Ok(ApiResponse::success("Token refreshed successfully", json!({ "accessToken": access_token })))
}
