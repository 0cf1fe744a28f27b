use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Model;
use crate::database::store::Collection;
use crate::error::ApiError;
use crate::types::Role;

/// Signup payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(range(min = 1, message = "Phone number must be a positive integer"))]
    pub phone_number: i64,
    #[serde(default)]
    #[validate(url(message = "Invalid avatar url"))]
    pub user_avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_email_verified: bool,
}

impl NewUser {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_lowercase();
        self.email = normalize_email(&self.email);
    }

    /// Stored form with the password already hashed
    pub fn into_user(self, password_hash: String) -> User {
        User {
            name: self.name,
            email: self.email,
            password: password_hash,
            phone_number: self.phone_number,
            user_avatar_url: self.user_avatar_url,
            is_verified: self.is_verified,
            is_email_verified: self.is_email_verified,
            roles: default_roles(),
        }
    }
}

/// A stored account. `password` holds the argon2 hash and never leaves the API.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    #[validate(range(min = 1, message = "Phone number must be a positive integer"))]
    pub phone_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Invalid avatar url"))]
    pub user_avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default = "default_roles")]
    pub roles: Vec<Role>,
}

fn default_roles() -> Vec<Role> {
    vec![Role::SpaceProvider]
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Model for User {
    const COLLECTION: Collection = Collection::Users;
    const ENTITY: &'static str = "User";

    fn normalize(&mut self) {
        self.name = self.name.trim().to_lowercase();
        self.email = normalize_email(&self.email);
    }
}

/// Partial profile update; roles are deliberately absent
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    #[validate(range(min = 1, message = "Phone number must be a positive integer"))]
    pub phone_number: Option<i64>,
    #[validate(url(message = "Invalid avatar url"))]
    pub user_avatar_url: Option<String>,
    pub is_verified: Option<bool>,
    pub is_email_verified: Option<bool>,
}

impl UserUpdate {
    /// Apply every provided field except the password, which the caller hashes first
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(url) = self.user_avatar_url {
            user.user_avatar_url = Some(url);
        }
        if let Some(flag) = self.is_verified {
            user.is_verified = flag;
        }
        if let Some(flag) = self.is_email_verified {
            user.is_email_verified = flag;
        }
        user.normalize();
    }
}

/// Login accepts either identifier
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(range(min = 1, message = "Phone number must be a positive integer"))]
    pub phone_number: Option<i64>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

pub enum LoginIdentifier {
    Email(String),
    PhoneNumber(i64),
}

impl LoginRequest {
    pub fn identifier(&self) -> Result<LoginIdentifier, ApiError> {
        match (&self.email, self.phone_number) {
            (Some(email), _) => Ok(LoginIdentifier::Email(normalize_email(email))),
            (None, Some(phone)) => Ok(LoginIdentifier::PhoneNumber(phone)),
            (None, None) => Err(ApiError::validation_error(vec![
                "email: Either email or phone number must be provided".to_string(),
                "phoneNumber: Either email or phone number must be provided".to_string(),
            ])),
        }
    }
}
