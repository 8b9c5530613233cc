use axum::{
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::StatusCode,
};
use std::marker::PhantomData;
use tracing::debug;

use crate::config::MAX_UPLOAD_BYTES;
use crate::error::LinkpageError;
use crate::types::upload::{UploadKind, UploadedImage};

/// Marker for the multipart slot an [`ImageUpload`] reads.
pub trait UploadSlot: Send + Sync + 'static {
    const KIND: UploadKind;
}

pub struct AvatarSlot;

impl UploadSlot for AvatarSlot {
    const KIND: UploadKind = UploadKind::Avatar;
}

pub struct BackgroundSlot;

impl UploadSlot for BackgroundSlot {
    const KIND: UploadKind = UploadKind::Background;
}

/// One image file taken from the multipart field named after `S::KIND`.
///
/// Rejects with 400 when the file is missing, is not `image/*`, or exceeds
/// [`MAX_UPLOAD_BYTES`]. Other fields, and text parts under the expected
/// name, are skipped.
pub struct ImageUpload<S>(pub UploadedImage, PhantomData<S>);

impl<S> ImageUpload<S> {
    pub fn into_inner(self) -> UploadedImage {
        self.0
    }
}

impl<S, St> FromRequest<St> for ImageUpload<S>
where
    S: UploadSlot,
    St: Send + Sync,
{
    type Rejection = LinkpageError;

    async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
        // Not multipart at all: there is no file to find.
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|_| LinkpageError::NoFileUploaded)?;

        let wanted = S::KIND.field_name();
        while let Some(mut field) = multipart.next_field().await.map_err(map_multipart_error)? {
            if field.name() != Some(wanted) {
                debug!(field = ?field.name(), "skipping unexpected multipart field");
                continue;
            }
            // A part without a filename is a text value, not a file.
            if field.file_name().is_none() {
                debug!(field = wanted, "skipping text part");
                continue;
            }

            let mime_type = field.content_type().unwrap_or_default().to_string();
            if !mime_type.starts_with("image/") {
                return Err(LinkpageError::NotAnImage);
            }
            let original_name = field.file_name().map(str::to_string);

            let mut buf: Vec<u8> = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(map_multipart_error)? {
                if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
                    return Err(LinkpageError::FileTooLarge);
                }
                buf.extend_from_slice(&chunk);
            }

            let image = UploadedImage {
                bytes: buf.into(),
                mime_type,
                original_name,
            };
            return Ok(ImageUpload(image, PhantomData));
        }

        Err(LinkpageError::NoFileUploaded)
    }
}

fn map_multipart_error(err: MultipartError) -> LinkpageError {
    // The body limit surfaces as 413 from the multipart reader.
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        LinkpageError::FileTooLarge
    } else {
        LinkpageError::MalformedMultipart(err.body_text())
    }
}
