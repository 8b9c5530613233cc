use serde::{Deserialize, Serialize};

use crate::config::{Config, GOOGLE_AUTH_URI, GOOGLE_CERTS_URI, GOOGLE_TOKEN_URI};
use crate::error::LinkpageError;

/// A Google service-account key, in the shape of the downloaded JSON file.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default = "default_key_type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_certs_uri")]
    pub auth_provider_x509_cert_url: String,
    #[serde(default)]
    pub client_x509_cert_url: String,
}

// The private key never reaches the logs.
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

fn default_key_type() -> String {
    "service_account".to_string()
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.as_str().to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.as_str().to_string()
}

fn default_certs_uri() -> String {
    GOOGLE_CERTS_URI.as_str().to_string()
}

/// Discrete `FIREBASE_*` fields, used when no JSON blob is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAccountFields {
    pub project_id: Option<String>,
    pub private_key_id: Option<String>,
    pub private_key: Option<String>,
    pub client_email: Option<String>,
    pub client_id: Option<String>,
    pub client_x509_cert_url: Option<String>,
}

/// Where the service-account credential comes from. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAccountSource {
    Json(String),
    Fields(ServiceAccountFields),
}

impl ServiceAccountSource {
    pub fn from_config(cfg: &Config) -> Self {
        match cfg.firebase_service_account_key.as_deref() {
            Some(blob) if !blob.trim().is_empty() => Self::Json(blob.to_string()),
            _ => Self::Fields(ServiceAccountFields {
                project_id: cfg.firebase_project_id.clone(),
                private_key_id: cfg.firebase_private_key_id.clone(),
                private_key: cfg.firebase_private_key.clone(),
                client_email: cfg.firebase_client_email.clone(),
                client_id: cfg.firebase_client_id.clone(),
                client_x509_cert_url: cfg.firebase_client_x509_cert_url.clone(),
            }),
        }
    }

    pub fn resolve(self) -> Result<ServiceAccountKey, LinkpageError> {
        match self {
            Self::Json(blob) => serde_json::from_str(&blob)
                .map_err(|e| LinkpageError::MalformedCredential(e.to_string())),
            Self::Fields(fields) => Ok(ServiceAccountKey {
                key_type: default_key_type(),
                project_id: fields.project_id.unwrap_or_default(),
                private_key_id: fields.private_key_id.unwrap_or_default(),
                private_key: fields
                    .private_key
                    .map(|key| key.replace("\\n", "\n"))
                    .unwrap_or_default(),
                client_email: fields.client_email.unwrap_or_default(),
                client_id: fields.client_id.unwrap_or_default(),
                auth_uri: default_auth_uri(),
                token_uri: default_token_uri(),
                auth_provider_x509_cert_url: default_certs_uri(),
                client_x509_cert_url: fields.client_x509_cert_url.unwrap_or_default(),
            }),
        }
    }
}

/// OAuth client plus long-lived refresh token used for Drive uploads.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DriveOauthCredential {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for DriveOauthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveOauthCredential")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl DriveOauthCredential {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            client_id: cfg.google_client_id.clone().unwrap_or_default(),
            client_secret: cfg.google_client_secret.clone().unwrap_or_default(),
            refresh_token: cfg.google_refresh_token.clone().unwrap_or_default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.refresh_token.is_empty()
    }
}
