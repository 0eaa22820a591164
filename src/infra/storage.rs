//! Object-storage boundary for course images.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{StorageConfig, UPLOAD_TIMEOUT};
use crate::errors::{AppError, AppResult};

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Handle to a stored image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

/// Boundary to the external image store.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<StoredImage>;
}

/// Cloudinary-style unsigned upload adapter
pub struct CloudinaryStorage {
    client: Client,
    upload_url: String,
    upload_preset: String,
}

impl CloudinaryStorage {
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client build failed: {}", e)))?;
        Ok(Self {
            client,
            upload_url: config.upload_url.clone(),
            upload_preset: config.upload_preset.clone(),
        })
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[async_trait]
impl ImageStorage for CloudinaryStorage {
    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<StoredImage> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::bad_request(format!("Invalid content type: {}", e)))?;
        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::upstream("Image upload timed out")
                } else {
                    AppError::upstream(format!("Image upload failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "Image store returned {}",
                status
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Malformed upload response: {}", e)))?;

        Ok(StoredImage {
            url: parsed.secure_url,
            public_id: parsed.public_id,
        })
    }
}
