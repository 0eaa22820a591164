//! Image upload handlers.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Router,
};

use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::errors::{AppError, AppResult};
use crate::infra::StoredImage;
use crate::types::Created;

// Multipart framing overhead on top of the image cap
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Upload routes; all require authentication
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/image", post(upload_image))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

/// Upload an image (any authenticated user)
#[utoipa::path(
    post,
    path = "/api/uploads/image",
    tag = "Uploads",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Image stored", body = StoredImage),
        (status = 400, description = "Missing file, wrong type or too large"),
        (status = 503, description = "Image storage not configured")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Created<StoredImage>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .ok_or_else(|| AppError::bad_request("File field has no content type"))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read upload: {}", e)))?;

        let stored = state
            .upload_service
            .upload_image(filename, content_type, bytes.to_vec())
            .await?;
        return Ok(Created(stored));
    }

    Err(AppError::bad_request("Please upload a file"))
}
