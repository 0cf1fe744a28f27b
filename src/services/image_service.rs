// Presigned upload issuance and stored-image deletion
use futures::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::ApiError;
use crate::storage::{object_key, ObjectStorage, PresignedPost};

/// Client-declared file about to be uploaded
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub file_name: String,
    pub file_type: String,
    pub file_size: f64,
}

impl FileDescriptor {
    /// Problems with this file as `path: message` strings
    fn problems(&self, path: &str, config: &StorageConfig) -> Vec<String> {
        let mut problems = Vec::new();
        if self.file_name.trim().is_empty() {
            problems.push(format!("{}.fileName: File name is required", path));
        }
        if !config.allowed_mime_types.iter().any(|t| t == &self.file_type) {
            problems.push(format!(
                "{}.fileType: Invalid file type. Allowed types: {}",
                path,
                config.allowed_mime_types.join(", ")
            ));
        }
        if self.file_size <= 0.0 {
            problems.push(format!("{}.fileSize: File size must be a positive number", path));
        } else if self.file_size > config.max_declared_file_bytes as f64 {
            problems.push(format!(
                "{}.fileSize: File too large. Max size is {} bytes.",
                path, config.max_declared_file_bytes
            ));
        }
        problems
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBatch {
    pub presigned_posts: Vec<PresignedPost>,
    pub file_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub deleted_urls: Vec<String>,
    pub failed_urls: Vec<String>,
}

/// Storage folder names: lowercase segments of letters, digits and dashes
pub fn validate_folder(folder: &str) -> Result<(), ApiError> {
    let valid = !folder.is_empty()
        && folder.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
        });
    if valid {
        Ok(())
    } else {
        Err(ApiError::invalid_field("folder", "Invalid folder name"))
    }
}

pub fn check_file(config: &StorageConfig, file: &FileDescriptor, path: &str) -> Result<(), ApiError> {
    let problems = file.problems(path, config);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(problems))
    }
}

/// One presigned POST per file plus the public URLs the files will have
pub async fn issue_upload_urls(
    storage: &dyn ObjectStorage,
    config: &StorageConfig,
    folder: &str,
    files: &[FileDescriptor],
) -> Result<UploadBatch, ApiError> {
    if files.is_empty() {
        return Err(ApiError::invalid_field("imageData", "At least one file is required"));
    }
    if files.len() > config.max_batch_files {
        return Err(ApiError::invalid_field(
            "imageData",
            format!("A maximum of {} files can be uploaded at once", config.max_batch_files),
        ));
    }

    let problems: Vec<String> = files
        .iter()
        .enumerate()
        .flat_map(|(i, file)| file.problems(&format!("imageData.{}", i), config))
        .collect();
    if !problems.is_empty() {
        return Err(ApiError::validation_error(problems));
    }

    let presigned_posts = try_join_all(
        files
            .iter()
            .map(|file| async move { storage.presigned_post(&object_key(folder, &file.file_type), &file.file_type).await }),
    )
    .await?;
    let file_urls = presigned_posts.iter().map(|post| storage.public_url(&post.key)).collect();

    tracing::debug!("Issued {} upload credentials in {}", presigned_posts.len(), folder);
    Ok(UploadBatch { presigned_posts, file_urls })
}

/// Single presigned POST for one file
pub async fn issue_upload_url(
    storage: &dyn ObjectStorage,
    config: &StorageConfig,
    folder: &str,
    file: &FileDescriptor,
) -> Result<(PresignedPost, String), ApiError> {
    check_file(config, file, "imageData")?;
    let post = storage.presigned_post(&object_key(folder, &file.file_type), &file.file_type).await?;
    let url = storage.public_url(&post.key);
    Ok((post, url))
}

pub async fn delete_image(storage: &dyn ObjectStorage, url: &str) -> Result<(), ApiError> {
    let key = storage.key_from_url(url)?;
    storage.delete_object(&key).await?;
    tracing::info!("Deleted image {}", key);
    Ok(())
}

/// Delete every URL concurrently; failures are reported, never raised
pub async fn delete_images(storage: &dyn ObjectStorage, urls: &[String]) -> DeleteReport {
    let outcomes = join_all(urls.iter().map(|url| async move { (url, delete_image(storage, url).await) })).await;

    let mut report = DeleteReport::default();
    for (url, outcome) in outcomes {
        match outcome {
            Ok(()) => report.deleted_urls.push(url.clone()),
            Err(e) => {
                tracing::warn!("Failed to delete image {}: {}", url, e);
                report.failed_urls.push(url.clone());
            }
        }
    }
    report
}

/// Cleanup attached to document deletes
pub async fn cleanup_images(storage: &dyn ObjectStorage, urls: &[String]) {
    if urls.is_empty() {
        return;
    }
    let report = delete_images(storage, urls).await;
    if !report.failed_urls.is_empty() {
        tracing::warn!(
            "Image cleanup left {} of {} objects behind",
            report.failed_urls.len(),
            urls.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(file_type: &str, size: f64) -> FileDescriptor {
        FileDescriptor {
            file_name: "photo".into(),
            file_type: file_type.into(),
            file_size: size,
        }
    }

    #[test]
    fn file_rules() {
        let config = StorageConfig::defaults();
        assert!(file("image/png", 1024.0).problems("f", &config).is_empty());
        assert_eq!(
            file("image/gif", 1024.0).problems("f", &config),
            vec!["f.fileType: Invalid file type. Allowed types: image/jpeg, image/png, image/webp, image/jpg"]
        );
        assert_eq!(
            file("image/png", 0.0).problems("f", &config),
            vec!["f.fileSize: File size must be a positive number"]
        );
        assert_eq!(
            file("image/png", 60.0 * 1024.0 * 1024.0).problems("f", &config),
            vec!["f.fileSize: File too large. Max size is 52428800 bytes."]
        );
    }

    #[test]
    fn folder_names() {
        assert!(validate_folder("room-images").is_ok());
        assert!(validate_folder("listings/room_1").is_ok());
        assert!(validate_folder("").is_err());
        assert!(validate_folder("../etc").is_err());
        assert!(validate_folder("Room Images").is_err());
    }
}
