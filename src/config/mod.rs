use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. When absent in development the in-memory store is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_rate_limiting: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    /// Key the rate limiter on the first `X-Forwarded-For` hop. Only safe behind a proxy that sets it.
    pub trust_proxy: bool,
    pub max_page_size: u64,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub cors_origins: Vec<String>,
    /// Marks the refresh cookie `Secure`. Off in development so plain http works.
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Base URL objects are served from; keys are appended to it.
    pub public_base_url: String,
    pub presign_expiry_secs: u64,
    /// Upper bound enforced by the presigned POST policy.
    pub max_upload_bytes: u64,
    /// Upper bound on the size a client may declare for a file.
    pub max_declared_file_bytes: u64,
    pub max_batch_files: usize,
    pub allowed_mime_types: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("RATE_LIMIT_ENABLED") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("RATE_LIMIT_MAX_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("RATE_LIMIT_WINDOW_MINUTES") {
            if let Ok(minutes) = v.parse::<u64>() {
                self.api.rate_limit_window_secs = minutes * 60;
            }
        }
        if let Ok(v) = env::var("TRUST_PROXY") {
            self.api.trust_proxy = v.parse().unwrap_or(self.api.trust_proxy);
        }
        if let Ok(v) = env::var("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("ACCESS_TOKEN_SECRET") {
            self.security.access_token_secret = v;
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_SECRET") {
            self.security.refresh_token_secret = v;
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("FRONTEND_URL") {
            let v = v.trim().to_string();
            if !v.is_empty() && !self.security.cors_origins.contains(&v) {
                self.security.cors_origins.push(v);
            }
        }
        if let Ok(v) = env::var("SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }

        // Storage overrides
        if let Ok(account) = env::var("CLOUDFLARE_ACCOUNT_ID") {
            if !account.trim().is_empty() {
                self.storage.endpoint = format!("https://{}.r2.cloudflarestorage.com", account.trim());
                self.storage.region = "auto".to_string();
            }
        }
        if let Ok(v) = env::var("STORAGE_ENDPOINT") {
            self.storage.endpoint = v;
        }
        if let Ok(v) = env::var("STORAGE_REGION") {
            self.storage.region = v;
        }
        if let Ok(v) = env::var("R2_BUCKET_NAME") {
            self.storage.bucket = v;
        }
        if let Ok(v) = env::var("R2_ACCESS_KEY_ID") {
            self.storage.access_key_id = v;
        }
        if let Ok(v) = env::var("R2_SECRET_ACCESS_KEY") {
            self.storage.secret_access_key = v;
        }
        if let Ok(v) = env::var("STORAGE_PUBLIC_URL") {
            self.storage.public_base_url = v;
        }
        if let Ok(v) = env::var("FILE_UPLOAD_MAX_SIZE") {
            self.storage.max_upload_bytes = v.parse().unwrap_or(self.storage.max_upload_bytes);
        }

        // Path-style public URLs unless a CDN base was given
        if self.storage.public_base_url.is_empty() && !self.storage.endpoint.is_empty() {
            self.storage.public_base_url = format!(
                "{}/{}",
                self.storage.endpoint.trim_end_matches('/'),
                self.storage.bucket
            );
        }

        self
    }

    /// Reject configurations that cannot serve traffic safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.access_token_secret.is_empty() {
            return Err(ConfigError::Missing("ACCESS_TOKEN_SECRET"));
        }
        if self.security.refresh_token_secret.is_empty() {
            return Err(ConfigError::Missing("REFRESH_TOKEN_SECRET"));
        }
        if self.environment == Environment::Development {
            return Ok(());
        }
        if self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.storage.access_key_id.is_empty() {
            return Err(ConfigError::Missing("R2_ACCESS_KEY_ID"));
        }
        if self.storage.secret_access_key.is_empty() {
            return Err(ConfigError::Missing("R2_SECRET_ACCESS_KEY"));
        }
        if self.storage.bucket.is_empty() {
            return Err(ConfigError::Missing("R2_BUCKET_NAME"));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 8000,
                enable_rate_limiting: false,
                rate_limit_requests: 100,
                rate_limit_window_secs: 10 * 60,
                trust_proxy: false,
                max_page_size: 100,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                access_token_secret: "dev-access-secret".to_string(),
                refresh_token_secret: "dev-refresh-secret".to_string(),
                access_token_ttl_secs: 15 * 60,
                refresh_token_ttl_secs: 90 * 24 * 60 * 60,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                secure_cookies: false,
            },
            storage: StorageConfig::defaults(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 8000,
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 10 * 60,
                trust_proxy: false,
                max_page_size: 100,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                access_token_secret: String::new(),
                refresh_token_secret: String::new(),
                access_token_ttl_secs: 15 * 60,
                refresh_token_ttl_secs: 90 * 24 * 60 * 60,
                cors_origins: vec!["https://cityhom-com-frotnend.vercel.app".to_string()],
                secure_cookies: true,
            },
            storage: StorageConfig::defaults(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                port: 8000,
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 10 * 60,
                trust_proxy: false,
                max_page_size: 50,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                access_token_secret: String::new(),
                refresh_token_secret: String::new(),
                access_token_ttl_secs: 15 * 60,
                refresh_token_ttl_secs: 90 * 24 * 60 * 60,
                cors_origins: vec!["https://www.cityhom.com".to_string()],
                secure_cookies: true,
            },
            storage: StorageConfig::defaults(),
        }
    }
}

impl StorageConfig {
    pub fn defaults() -> Self {
        Self {
            endpoint: String::new(),
            region: "auto".to_string(),
            bucket: "cityhom".to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            public_base_url: String::new(),
            presign_expiry_secs: 600,
            max_upload_bytes: 10 * 1024 * 1024,
            max_declared_file_bytes: 50 * 1024 * 1024,
            max_batch_files: 20,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "image/jpg".to_string(),
            ],
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
