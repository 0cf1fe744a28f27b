use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::types::Role;

pub mod password;
pub mod roles;

pub use password::{hash_password, verify_password};
pub use roles::has_access;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, roles: Vec<Role>, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            roles,
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Short-lived bearer token returned in response bodies
pub fn issue_access_token(security: &SecurityConfig, user_id: Uuid, roles: &[Role]) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, roles.to_vec(), security.access_token_ttl_secs);
    generate_jwt(&claims, &security.access_token_secret)
}

/// Long-lived token delivered in the refresh cookie
pub fn issue_refresh_token(security: &SecurityConfig, user_id: Uuid, roles: &[Role]) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, roles.to_vec(), security.refresh_token_ttl_secs);
    generate_jwt(&claims, &security.refresh_token_secret)
}

pub fn verify_access_token(security: &SecurityConfig, token: &str) -> Result<Claims, JwtError> {
    validate_jwt(token, &security.access_token_secret)
}

pub fn verify_refresh_token(security: &SecurityConfig, token: &str) -> Result<Claims, JwtError> {
    validate_jwt(token, &security.refresh_token_secret)
}

fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
}
