//! Image upload service: validation in front of the image store.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MAX_UPLOAD_BYTES;
use crate::errors::{AppError, AppResult};
use crate::infra::{ImageStorage, StoredImage};

/// Reject non-image payloads and anything over the size cap.
fn validate_upload(content_type: &str, size: usize) -> AppResult<()> {
    if !content_type.starts_with("image/") {
        return Err(AppError::bad_request(
            "Not an image! Please upload only images.",
        ));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::bad_request("Image must be smaller than 5MB"));
    }
    Ok(())
}

#[async_trait]
pub trait UploadService: Send + Sync {
    /// Validate and store a course image
    async fn upload_image(
        &self,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> AppResult<StoredImage>;
}

pub struct Uploader {
    storage: Option<Arc<dyn ImageStorage>>,
}

impl Uploader {
    pub fn new(storage: Option<Arc<dyn ImageStorage>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UploadService for Uploader {
    async fn upload_image(
        &self,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> AppResult<StoredImage> {
        validate_upload(&content_type, bytes.len())?;
        let storage = self
            .storage
            .as_ref()
            .ok_or(AppError::NotConfigured("image storage"))?;
        storage.store(&filename, &content_type, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_image_content() {
        assert!(validate_upload("application/pdf", 100).is_err());
        assert!(validate_upload("text/plain", 100).is_err());
    }

    #[test]
    fn accepts_images_up_to_the_cap() {
        assert!(validate_upload("image/png", MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload("image/jpeg", 1).is_ok());
    }

    #[test]
    fn rejects_oversized_images() {
        assert!(validate_upload("image/png", MAX_UPLOAD_BYTES + 1).is_err());
    }
}
