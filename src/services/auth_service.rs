// Signup, login and refresh-token exchange
use serde_json::Value;
use validator::Validate;

use crate::api::user_profile;
use crate::auth::{hash_password, issue_access_token, issue_refresh_token, verify_password, verify_refresh_token};
use crate::config::SecurityConfig;
use crate::database::store::{Collection, Document, DocumentStore};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::models::user::LoginIdentifier;
use crate::models::{to_body, LoginRequest, NewUser};
use crate::types::Role;

/// Tokens for a freshly authenticated user
#[derive(Debug)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Profile without the password hash
    pub user: Value,
}

/// Roles stored on a user document; an unreadable list grants nothing
pub fn roles_of(document: &Document) -> Vec<Role> {
    document
        .body
        .get("roles")
        .cloned()
        .and_then(|roles| serde_json::from_value(roles).ok())
        .unwrap_or_default()
}

fn open_session(security: &SecurityConfig, user: &Document) -> Result<Session, ApiError> {
    let roles = roles_of(user);
    Ok(Session {
        access_token: issue_access_token(security, user.id, &roles)?,
        refresh_token: issue_refresh_token(security, user.id, &roles)?,
        user: user_profile(user),
    })
}

/// Argon2 is CPU bound; keep it off the async workers
pub async fn hash_in_background(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal("Password hashing task failed", e))?
        .map_err(|e| ApiError::internal("Password hashing failed", e))
}

pub async fn signup(store: &dyn DocumentStore, security: &SecurityConfig, mut new_user: NewUser) -> Result<Session, ApiError> {
    new_user.normalize();
    new_user.validate()?;

    let hash = hash_in_background(new_user.password.clone()).await?;
    let user = new_user.into_user(hash);
    let document = store.insert(Collection::Users, to_body(&user)?).await?;
    tracing::info!("Registered user {}", document.id);

    open_session(security, &document)
}

pub async fn login(store: &dyn DocumentStore, security: &SecurityConfig, request: LoginRequest) -> Result<Session, ApiError> {
    request.validate()?;

    let filter = match request.identifier()? {
        LoginIdentifier::Email(email) => Filter::new().eq("email", email),
        LoginIdentifier::PhoneNumber(phone) => Filter::new().eq("phoneNumber", phone),
    };
    let user = store
        .find_one(Collection::Users, &filter)
        .await?
        .ok_or_else(|| ApiError::bad_request("User not found"))?;

    let stored_hash = user.string("password").unwrap_or_default().to_string();
    let password = request.password;
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::internal("Password verification task failed", e))?;
    if !valid {
        tracing::debug!("Rejected login for user {}", user.id);
        return Err(ApiError::bad_request("Invalid credentials"));
    }

    open_session(security, &user)
}

/// Exchange the refresh cookie for a new access token
pub async fn refresh(store: &dyn DocumentStore, security: &SecurityConfig, cookie: Option<&str>) -> Result<String, ApiError> {
    let token = cookie
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Please login first"))?;

    let claims = verify_refresh_token(security, token).map_err(|e| {
        tracing::debug!("Rejected refresh token: {}", e);
        ApiError::forbidden("Forbidden")
    })?;

    let user = store
        .find_by_id(Collection::Users, claims.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    Ok(issue_access_token(security, user.id, &roles_of(&user))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::memory::MemoryStore;
    use crate::auth::verify_access_token;
    use serde_json::json;

    fn new_user(email: &str, phone: i64) -> NewUser {
        serde_json::from_value(json!({
            "name": "Gita Thapa",
            "email": email,
            "password": "secret12",
            "phoneNumber": phone
        }))
        .unwrap()
    }

    fn login_request(body: Value) -> LoginRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn signup_then_login_by_email_or_phone() {
        let store = MemoryStore::new();
        let security = AppConfig::development().security;

        let session = signup(&store, &security, new_user("Gita@Example.com", 9811111111)).await.unwrap();
        assert_eq!(session.user["email"], "gita@example.com");
        assert!(session.user.get("password").is_none());
        assert_eq!(session.user["roles"], json!(["space_provider"]));

        let by_email = login(&store, &security, login_request(json!({"email": "GITA@example.com", "password": "secret12"})))
            .await
            .unwrap();
        let claims = verify_access_token(&security, &by_email.access_token).unwrap();
        assert_eq!(claims.roles, vec![Role::SpaceProvider]);

        let by_phone = login(&store, &security, login_request(json!({"phoneNumber": 9811111111i64, "password": "secret12"})))
            .await
            .unwrap();
        assert_eq!(by_phone.user["_id"], session.user["_id"]);
    }

    #[tokio::test]
    async fn login_failures_are_bad_requests() {
        let store = MemoryStore::new();
        let security = AppConfig::development().security;
        signup(&store, &security, new_user("hari@example.com", 9822222222)).await.unwrap();

        let err = login(&store, &security, login_request(json!({"email": "nobody@example.com", "password": "secret12"})))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "User not found");

        let err = login(&store, &security, login_request(json!({"email": "hari@example.com", "password": "wrong-pass"})))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let security = AppConfig::development().security;
        signup(&store, &security, new_user("ram@example.com", 9833333333)).await.unwrap();
        let err = signup(&store, &security, new_user("ram@example.com", 9844444444)).await.unwrap_err();
        assert_eq!(err.message(), "Email address is already in use");
    }

    #[tokio::test]
    async fn refresh_requires_a_valid_cookie_and_a_live_user() {
        let store = MemoryStore::new();
        let security = AppConfig::development().security;
        let session = signup(&store, &security, new_user("sita@example.com", 9855555555)).await.unwrap();

        assert_eq!(refresh(&store, &security, None).await.unwrap_err().message(), "Please login first");
        assert_eq!(refresh(&store, &security, Some("garbage")).await.unwrap_err().message(), "Forbidden");
        // access tokens are signed with a different secret
        assert_eq!(
            refresh(&store, &security, Some(&session.access_token)).await.unwrap_err().message(),
            "Forbidden"
        );

        let token = refresh(&store, &security, Some(&session.refresh_token)).await.unwrap();
        assert!(verify_access_token(&security, &token).is_ok());

        let ghost = issue_refresh_token(&security, uuid::Uuid::new_v4(), &[Role::User]).unwrap();
        assert_eq!(refresh(&store, &security, Some(&ghost)).await.unwrap_err().message(), "Unauthorized");
    }
}
