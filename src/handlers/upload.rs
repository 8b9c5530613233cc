use axum::{Json, extract::State};
use chrono::Utc;
use tracing::{error, info};

use crate::middleware::image_upload::{AvatarSlot, BackgroundSlot, ImageUpload, UploadSlot};
use crate::types::upload::UploadResponse;
use crate::{LinkpageError, router::LinkpageState};

/// POST /api/upload/avatar
pub async fn upload_avatar(
    State(state): State<LinkpageState>,
    upload: ImageUpload<AvatarSlot>,
) -> Result<Json<UploadResponse>, LinkpageError> {
    upload_image(state, upload).await
}

/// POST /api/upload/background
pub async fn upload_background(
    State(state): State<LinkpageState>,
    upload: ImageUpload<BackgroundSlot>,
) -> Result<Json<UploadResponse>, LinkpageError> {
    upload_image(state, upload).await
}

async fn upload_image<S: UploadSlot>(
    state: LinkpageState,
    upload: ImageUpload<S>,
) -> Result<Json<UploadResponse>, LinkpageError> {
    let kind = S::KIND;
    let image = upload.into_inner();
    let file_name = kind.file_name(&image.mime_type, Utc::now());

    info!(
        kind = %kind,
        file_name = %file_name,
        size = image.bytes.len(),
        original = ?image.original_name,
        "uploading image"
    );

    let result = state
        .uploader
        .upload(&file_name, image)
        .await
        .map_err(|e| e.during_upload(kind))
        .inspect_err(|e| {
            error!(error = %e, "Error uploading {kind}");
        })?;

    Ok(Json(UploadResponse::new(kind, result)))
}
