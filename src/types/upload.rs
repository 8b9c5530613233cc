use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::config::DRIVE_PUBLIC_URL_PREFIX;

/// Which site image an upload replaces. Also names the multipart field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Avatar,
    Background,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Avatar => "avatar",
            UploadKind::Background => "background",
        }
    }

    pub fn field_name(&self) -> &'static str {
        self.as_str()
    }

    /// `<kind>-<epoch-millis>.<mime subtype>`
    pub fn file_name(&self, mime_type: &str, now: DateTime<Utc>) -> String {
        let ext = mime_type.split('/').nth(1).unwrap_or_default();
        format!("{}-{}.{}", self.as_str(), now.timestamp_millis(), ext)
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            UploadKind::Avatar => "Avatar uploaded successfully",
            UploadKind::Background => "Background uploaded successfully",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accepted image, buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub mime_type: String,
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_id: String,
    pub public_url: String,
    pub success: bool,
}

impl UploadResult {
    pub fn for_file(file_id: impl Into<String>) -> Self {
        let file_id = file_id.into();
        Self {
            public_url: format!("{DRIVE_PUBLIC_URL_PREFIX}{file_id}"),
            file_id,
            success: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_id: String,
    pub public_url: String,
    pub message: String,
}

impl UploadResponse {
    pub fn new(kind: UploadKind, result: UploadResult) -> Self {
        Self {
            success: result.success,
            file_id: result.file_id,
            public_url: result.public_url,
            message: kind.success_message().to_string(),
        }
    }
}
