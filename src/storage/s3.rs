use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use super::sigv4::{self, Credentials, PostPolicy};
use super::{ObjectStorage, PresignedPost, StorageError};
use crate::config::StorageConfig;

/// S3-compatible bucket (Cloudflare R2, AWS S3, MinIO) addressed path-style
pub struct S3Storage {
    config: StorageConfig,
    credentials: Credentials,
    client: reqwest::Client,
}

impl S3Storage {
    pub fn new(config: StorageConfig) -> Self {
        let credentials = Credentials {
            access_key_id: config.access_key_id.clone(),
            secret_access_key: config.secret_access_key.clone(),
            region: config.region.clone(),
        };
        Self {
            config,
            credentials,
            client: reqwest::Client::new(),
        }
    }

    fn bucket_url(&self) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), self.config.bucket)
    }

    fn object_url(&self, key: &str) -> Result<Url, StorageError> {
        let raw = format!("{}/{}", self.bucket_url(), sigv4::uri_encode(key, true));
        Url::parse(&raw).map_err(|_| StorageError::InvalidUrl(raw))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn presigned_post(&self, key: &str, content_type: &str) -> Result<PresignedPost, StorageError> {
        let policy = PostPolicy {
            bucket: &self.config.bucket,
            key,
            content_type,
            max_bytes: self.config.max_upload_bytes,
            expires_in_secs: self.config.presign_expiry_secs as i64,
        };
        let fields = policy.sign(&self.credentials, Utc::now())?;
        Ok(PresignedPost {
            url: self.bucket_url(),
            fields,
            key: key.to_string(),
        })
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let url = sigv4::presign_url(
            "DELETE",
            &self.object_url(key)?,
            &self.credentials,
            Utc::now(),
            self.config.presign_expiry_secs,
        )?;
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!("Deleted object {}", key);
            Ok(())
        } else {
            Err(StorageError::Status {
                status: status.as_u16(),
                key: key.to_string(),
            })
        }
    }

    fn public_base_url(&self) -> &str {
        &self.config.public_base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> S3Storage {
        let mut config = StorageConfig::defaults();
        config.endpoint = "https://acct.r2.cloudflarestorage.com/".into();
        config.bucket = "cityhom".into();
        config.public_base_url = "https://cdn.cityhom.com".into();
        config.access_key_id = "AKID".into();
        config.secret_access_key = "secret".into();
        S3Storage::new(config)
    }

    #[tokio::test]
    async fn post_targets_the_bucket() {
        let storage = storage();
        let post = storage.presigned_post("room-images/a.png", "image/png").await.unwrap();
        assert_eq!(post.url, "https://acct.r2.cloudflarestorage.com/cityhom");
        assert_eq!(post.fields["key"], "room-images/a.png");
        assert_eq!(post.fields["Content-Type"], "image/png");
    }

    #[test]
    fn public_urls_round_trip_to_keys() {
        let storage = storage();
        let url = storage.public_url("room-images/a.png");
        assert_eq!(url, "https://cdn.cityhom.com/room-images/a.png");
        assert_eq!(storage.key_from_url(&url).unwrap(), "room-images/a.png");
        assert_eq!(
            storage.object_url("room-images/a b.png").unwrap().as_str(),
            "https://acct.r2.cloudflarestorage.com/cityhom/room-images/a%20b.png"
        );
    }
}
