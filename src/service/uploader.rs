use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::{DriveApi, DriveEndpoints};
use crate::error::LinkpageError;
use crate::google_oauth::DriveOauthCredential;
use crate::google_oauth::endpoints::GoogleOauthEndpoints;
use crate::types::upload::{UploadResult, UploadedImage};

/// Stores an accepted image somewhere publicly reachable.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(
        &self,
        file_name: &str,
        image: UploadedImage,
    ) -> Result<UploadResult, LinkpageError>;
}

/// Uploads into a Drive folder with a user OAuth client.
pub struct DriveUploader {
    client: reqwest::Client,
    oauth: DriveOauthCredential,
    folder_id: String,
    endpoints: DriveEndpoints,
}

impl DriveUploader {
    pub fn new(client: reqwest::Client, oauth: DriveOauthCredential, folder_id: String) -> Self {
        if !oauth.is_complete() {
            warn!("Drive OAuth client is incomplete; uploads will fail until GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN are set");
        }
        Self {
            client,
            oauth,
            folder_id,
            endpoints: DriveEndpoints::default(),
        }
    }

    /// Send every call to `endpoints` instead of Google.
    pub fn with_endpoints(mut self, endpoints: DriveEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[async_trait]
impl ImageUploader for DriveUploader {
    async fn upload(
        &self,
        file_name: &str,
        image: UploadedImage,
    ) -> Result<UploadResult, LinkpageError> {
        // A fresh access token per upload; nothing is cached between requests.
        let token = GoogleOauthEndpoints::refresh_access_token(
            &self.oauth,
            &self.endpoints.token_url,
            self.client.clone(),
        )
        .await?;

        let file_id = DriveApi::create_file(
            self.client.clone(),
            &self.endpoints,
            &token,
            file_name,
            &self.folder_id,
            &image.mime_type,
            image.bytes,
        )
        .await?;
        info!(file_id = %file_id, file_name, "file stored in Drive");

        // A failure here leaves the file uploaded but private.
        DriveApi::grant_public_read(self.client.clone(), &self.endpoints, &token, &file_id)
            .await?;

        Ok(UploadResult::for_file(file_id))
    }
}

/// Shared outbound HTTP client for Google APIs.
pub fn build_http_client() -> Result<reqwest::Client, LinkpageError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("linkpage/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}
