// Object storage boundary: presigned uploads, deletes and URL <-> key mapping
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

pub mod s3;
pub mod sigv4;

pub use s3::S3Storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage returned {status} for {key}")]
    Status { status: u16, key: String },
}

/// Credential a client uses to upload one file directly to the bucket
#[derive(Debug, Clone, Serialize)]
pub struct PresignedPost {
    pub url: String,
    pub fields: BTreeMap<String, String>,
    pub key: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn presigned_post(&self, key: &str, content_type: &str) -> Result<PresignedPost, StorageError>;

    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Base URL stored objects are served from
    fn public_base_url(&self) -> &str;

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url().trim_end_matches('/'), key)
    }

    fn key_from_url(&self, url: &str) -> Result<String, StorageError> {
        key_from_url(self.public_base_url(), url)
    }
}

/// `<folder>/<uuid>.<ext>`, the extension taken from the MIME subtype
pub fn object_key(folder: &str, content_type: &str) -> String {
    let ext = content_type.rsplit('/').next().unwrap_or("bin");
    format!("{}/{}.{}", folder, Uuid::new_v4(), ext)
}

/// Storage key of a stored object URL: its decoded path without the leading
/// slash, and without the public base path when the URL lives under it.
pub fn key_from_url(public_base_url: &str, url: &str) -> Result<String, StorageError> {
    let parsed = Url::parse(url).map_err(|_| StorageError::InvalidUrl(url.to_string()))?;
    let mut path = parsed.path().to_string();

    if let Ok(base) = Url::parse(public_base_url) {
        let base_path = base.path().trim_end_matches('/');
        if base.host_str() == parsed.host_str() && !base_path.is_empty() {
            if let Some(rest) = path.strip_prefix(base_path) {
                path = rest.to_string();
            }
        }
    }

    let key = percent_decode_str(path.trim_start_matches('/'))
        .decode_utf8_lossy()
        .into_owned();
    if key.is_empty() {
        return Err(StorageError::InvalidUrl(url.to_string()));
    }
    Ok(key)
}
