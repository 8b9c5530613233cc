use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use url::Url;

use crate::config::{DRIVE_FILES_URL, DRIVE_UPLOAD_URL, GOOGLE_TOKEN_URI};
use crate::error::LinkpageError;

/// Where the upload pipeline sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEndpoints {
    /// OAuth token endpoint used for the refresh-token grant.
    pub token_url: Url,
    /// `files.create` with `uploadType=multipart`.
    pub upload_url: Url,
    /// Base of `files/<id>/...`; must end with a slash.
    pub files_url: Url,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            token_url: GOOGLE_TOKEN_URI.clone(),
            upload_url: DRIVE_UPLOAD_URL.clone(),
            files_url: DRIVE_FILES_URL.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    parents: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: Option<String>,
}

/// Stateless calls into the Drive v3 REST API.
pub struct DriveApi;

impl DriveApi {
    /// Create `name` under `parent` with the given bytes; returns the new file id.
    pub async fn create_file(
        client: reqwest::Client,
        endpoints: &DriveEndpoints,
        token: impl AsRef<str>,
        name: &str,
        parent: &str,
        mime_type: &str,
        bytes: Bytes,
    ) -> Result<String, LinkpageError> {
        let metadata = serde_json::to_vec(&FileMetadata {
            name,
            parents: [parent],
        })?;
        let boundary = format!("linkpage-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_related(&boundary, &metadata, mime_type, &bytes);

        let resp = client
            .post(endpoints.upload_url.clone())
            .bearer_auth(token.as_ref())
            .header(
                "Content-Type",
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await?;
        let resp = ensure_success(resp, "files.create").await?;

        let created: CreatedFile = resp.json().await?;
        created.id.ok_or(LinkpageError::MissingUpstreamField("id"))
    }

    /// Let anyone with the link read the file.
    pub async fn grant_public_read(
        client: reqwest::Client,
        endpoints: &DriveEndpoints,
        token: impl AsRef<str>,
        file_id: &str,
    ) -> Result<(), LinkpageError> {
        let url = endpoints.files_url.join(&format!("{file_id}/permissions"))?;
        let resp = client
            .post(url)
            .bearer_auth(token.as_ref())
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;
        ensure_success(resp, "permissions.create").await?;
        Ok(())
    }
}

/// Drive's simple multipart upload: JSON metadata part, then the media part.
fn multipart_related(boundary: &str, metadata: &[u8], mime_type: &str, media: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(media.len() + metadata.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

async fn ensure_success(
    resp: reqwest::Response,
    call: &'static str,
) -> Result<reqwest::Response, LinkpageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!(%status, call, body = %body, "Drive API call failed");
    Err(LinkpageError::UpstreamStatus(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_url_is_under_files() {
        let endpoints = DriveEndpoints::default();
        let url = endpoints.files_url.join("abc123/permissions").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/drive/v3/files/abc123/permissions"
        );
    }

    #[test]
    fn related_body_frames_metadata_then_media() {
        let body = multipart_related("b0", br#"{"name":"a.png"}"#, "image/png", b"PNGDATA");
        let text = String::from_utf8(body).unwrap();
        assert_eq!(
            text,
            "--b0\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"name\":\"a.png\"}\
             \r\n--b0\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--b0--\r\n"
        );
    }
}
