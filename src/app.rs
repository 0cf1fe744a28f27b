// Application state and route composition
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::store::DocumentStore;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, rate_limit_middleware, require_roles, RateLimiter};
use crate::models::{Apartment, Flat, House, Land, Listing, Room};
use crate::storage::ObjectStorage;
use crate::types::Role;

/// Shared handles every handler receives through `State`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub config: Arc<AppConfig>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, storage: Arc<dyn ObjectStorage>, config: AppConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::from_config(&config.api));
        Self {
            store,
            storage,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(public::health::root))
        .route("/health", get(public::health::health))
        .merge(auth_routes(&state))
        .merge(listing_routes::<Room>(&state))
        .merge(listing_routes::<Flat>(&state))
        .merge(listing_routes::<House>(&state))
        .merge(listing_routes::<Land>(&state))
        .merge(listing_routes::<Apartment>(&state))
        .merge(search_routes())
        .merge(user_routes(&state))
        .merge(address_routes(&state))
        .merge(admin_routes(&state))
        .merge(image_routes(&state))
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware)),
        )
        .with_state(state)
}

/// Credentialed CORS for the configured origins; the refresh cookie is cross-site
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/v1/auth/signup", post(public::auth::signup))
        .route("/api/v1/auth/login", post(public::auth::login))
        .route("/api/v1/auth/refresh", post(public::auth::refresh));

    let protected = Router::new()
        .route("/api/v1/auth/logout", post(protected::auth::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    public.merge(protected)
}

/// Read routes are public; writes need a writer role and, per document, ownership or admin.
/// Layers added last run first, so the token is checked before the roles.
fn listing_routes<M: Listing>(state: &AppState) -> Router<AppState> {
    let base = format!("/api/v1/{}", M::CATEGORY.plural());
    let item = format!("{}/:id", base);

    let public = Router::new()
        .route(&base, get(public::listings::list::<M>))
        .route(&item, get(public::listings::show::<M>));

    let writers = Router::new()
        .route(&base, post(protected::listings::create::<M>))
        .route(
            &format!("{}/my-{}", base, M::CATEGORY.plural()),
            get(protected::listings::mine::<M>),
        )
        .route(
            &item,
            axum::routing::put(protected::listings::update::<M>).delete(protected::listings::delete::<M>),
        )
        .route_layer(middleware::from_fn_with_state(Role::LISTING_WRITERS, require_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let uploaders = Router::new()
        .route(&format!("{}/get-signed-url", base), post(protected::listings::signed_urls::<M>))
        .route_layer(middleware::from_fn_with_state(Role::LISTING_UPLOADERS, require_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    public.merge(writers).merge(uploaders)
}

fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/spaces/search", get(public::search::search))
        .route("/api/v1/spaces/new", get(public::search::new_listings))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/api/v1/users/get-signed-url", post(public::users::avatar_signed_url));

    let protected = Router::new()
        .route(
            "/api/v1/users/:id",
            get(protected::users::show)
                .put(protected::users::update)
                .delete(protected::users::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    public.merge(protected)
}

fn address_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/v1/addresses", post(protected::addresses::create))
        .route(
            "/api/v1/addresses/:id",
            get(protected::addresses::show)
                .put(protected::addresses::update)
                .delete(protected::addresses::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let elevated = Router::new()
        .route("/api/v1/addresses/addresses-with-user", get(elevated::admin::addresses_with_user))
        .route_layer(middleware::from_fn_with_state(Role::ADMINS, require_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    protected.merge(elevated)
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use elevated::admin;

    Router::new()
        .route("/api/v1/admin/dashboard", get(admin::dashboard))
        .route("/api/v1/admin/user-details", get(admin::user_details))
        .route("/api/v1/admin/rooms-with-owner", get(admin::listings_with_owner::<Room>))
        .route("/api/v1/admin/flats-with-owner", get(admin::listings_with_owner::<Flat>))
        .route("/api/v1/admin/houses-with-owner", get(admin::listings_with_owner::<House>))
        .route("/api/v1/admin/lands-with-owner", get(admin::listings_with_owner::<Land>))
        .route_layer(middleware::from_fn_with_state(Role::ADMINS, require_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn image_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/images/upload", post(protected::images::upload))
        .route("/api/v1/images/delete", delete(protected::images::delete))
        .route("/api/v1/images/delete-multiple", delete(protected::images::delete_many))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}
