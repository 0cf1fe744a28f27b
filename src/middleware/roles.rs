use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::auth::has_access;
use crate::error::ApiError;
use crate::types::Role;

/// Role gate; must run after `jwt_auth_middleware`.
/// Usage: `middleware::from_fn_with_state(Role::ADMINS, require_roles)`
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Unauthorized: Missing or invalid token"))?;

    if !has_access(&user.roles, allowed) {
        tracing::info!("User {} lacks roles {:?}", user.user_id, allowed);
        return Err(ApiError::forbidden("Forbidden: Insufficient permissions"));
    }

    Ok(next.run(request).await)
}
