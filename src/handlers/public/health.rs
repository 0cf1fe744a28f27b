// handlers/public/health.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "CityHom API",
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/api/v1/auth/* (signup, login and refresh are public)",
                "listings": "/api/v1/{rooms,flats,houses,lands,apartments}",
                "search": "/api/v1/spaces/search, /api/v1/spaces/new (public)",
                "users": "/api/v1/users/:id (owner or admin)",
                "addresses": "/api/v1/addresses",
                "admin": "/api/v1/admin/* (admin, super_admin)",
                "images": "/api/v1/images/*"
            }
        }
    }))
}

/// Liveness plus a database round trip
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "OK", "data": { "database": "up" } })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "message": "Database unavailable" })),
            )
        }
    }
}
