//! Startup wiring: credential resolution and the long-lived clients.

use std::sync::Arc;
use tracing::info;

use crate::config::{Config, FIRESTORE_SCOPE, StorageBackend};
use crate::db::{FirestoreStore, SITE_DATA_DOC, SiteDataStore, SqliteStore};
use crate::error::LinkpageError;
use crate::google_oauth::{
    DriveOauthCredential, ServiceAccountAuth, ServiceAccountKey, ServiceAccountSource,
};
use crate::router::LinkpageState;
use crate::service::uploader::{DriveUploader, build_http_client};

/// Resolve the service-account credential from the blob or the discrete fields.
pub fn load_service_account(cfg: &Config) -> Result<ServiceAccountKey, LinkpageError> {
    let source = ServiceAccountSource::from_config(cfg);
    let origin = match &source {
        ServiceAccountSource::Json(_) => "FIREBASE_SERVICE_ACCOUNT_KEY",
        ServiceAccountSource::Fields(_) => "FIREBASE_* fields",
    };
    let key = source.resolve()?;
    info!(origin, project_id = %key.project_id, "service account resolved");
    Ok(key)
}

/// Open the configured document store.
pub async fn open_store(
    cfg: &Config,
    key: ServiceAccountKey,
    http: reqwest::Client,
) -> Result<Arc<dyn SiteDataStore>, LinkpageError> {
    match cfg.storage {
        StorageBackend::Firestore => {
            let auth = ServiceAccountAuth::new(key, FIRESTORE_SCOPE, http.clone())?;
            let store = FirestoreStore::new(Arc::new(auth), http, SITE_DATA_DOC)?;
            info!(url = %store.document_url(), "firestore store ready");
            Ok(Arc::new(store))
        }
        StorageBackend::Sqlite => {
            let store = SqliteStore::connect(&cfg.database_url, SITE_DATA_DOC).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Everything the router needs, built once before the listener opens.
pub async fn build_state(cfg: &Config) -> Result<LinkpageState, LinkpageError> {
    let key = load_service_account(cfg)?;
    let http = build_http_client()?;

    let store = open_store(cfg, key, http.clone()).await?;
    let uploader = DriveUploader::new(
        http,
        DriveOauthCredential::from_config(cfg),
        cfg.google_drive_folder_id.clone(),
    );

    Ok(LinkpageState::new(store, Arc::new(uploader)))
}
