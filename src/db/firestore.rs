use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::config::FIRESTORE_BASE_URL;
use crate::db::SiteDataStore;
use crate::db::firestore_value::{decode_fields, encode_fields};
use crate::db::models::DocumentRef;
use crate::error::LinkpageError;
use crate::google_oauth::ServiceAccountAuth;
use crate::types::site_data::SiteData;

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorBody {
    error: FirestoreErrorStatus,
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

/// One Firestore document accessed over the REST API with service-account auth.
pub struct FirestoreStore {
    auth: Arc<ServiceAccountAuth>,
    http: reqwest::Client,
    doc_url: Url,
    doc_name: String,
}

impl FirestoreStore {
    pub fn new(
        auth: Arc<ServiceAccountAuth>,
        http: reqwest::Client,
        doc: DocumentRef,
    ) -> Result<Self, LinkpageError> {
        Self::with_base_url(auth, http, &FIRESTORE_BASE_URL, doc)
    }

    /// Same as [`FirestoreStore::new`] against another Firestore REST root.
    pub fn with_base_url(
        auth: Arc<ServiceAccountAuth>,
        http: reqwest::Client,
        base: &Url,
        doc: DocumentRef,
    ) -> Result<Self, LinkpageError> {
        let doc_url = document_url(base, auth.project_id(), doc)?;
        let doc_name = document_name(auth.project_id(), doc);
        Ok(Self {
            auth,
            http,
            doc_url,
            doc_name,
        })
    }

    pub fn document_url(&self) -> &Url {
        &self.doc_url
    }
}

/// `projects/<p>/databases/(default)/documents/<collection>/<id>` under `base`.
pub fn document_url(base: &Url, project_id: &str, doc: DocumentRef) -> Result<Url, LinkpageError> {
    Ok(base.join(&document_name(project_id, doc))?)
}

fn document_name(project_id: &str, doc: DocumentRef) -> String {
    format!(
        "projects/{}/databases/(default)/documents/{}",
        project_id,
        doc.path()
    )
}

/// Firestore answers 404 for a missing project or database too; only a
/// `NOT_FOUND` naming this document means "not written yet".
fn is_missing_document(body: &str, doc_name: &str) -> bool {
    serde_json::from_str::<FirestoreErrorBody>(body)
        .map(|b| b.error.status == "NOT_FOUND" && b.error.message.contains(doc_name))
        .unwrap_or(false)
}

#[async_trait]
impl SiteDataStore for FirestoreStore {
    async fn load(&self) -> Result<Option<SiteData>, LinkpageError> {
        let token = self.auth.access_token().await?;
        let resp = self
            .http
            .get(self.doc_url.clone())
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            if is_missing_document(&body, &self.doc_name) {
                debug!(url = %self.doc_url, "document does not exist yet");
                return Ok(None);
            }
            warn!(url = %self.doc_url, body = %body, "Firestore returned 404 for something other than the document");
            return Err(LinkpageError::UpstreamStatus(StatusCode::NOT_FOUND));
        }
        let resp = ensure_success(resp).await?;
        let document: FirestoreDocument = resp.json().await?;
        Ok(Some(decode_fields(&document.fields)))
    }

    async fn save(&self, data: &SiteData) -> Result<(), LinkpageError> {
        let token = self.auth.access_token().await?;
        // No updateMask: Firestore replaces every field of the document.
        let body = json!({ "fields": encode_fields(data) });
        let resp = self
            .http
            .patch(self.doc_url.clone())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        ensure_success(resp).await?;
        debug!(url = %self.doc_url, "document written");
        Ok(())
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, LinkpageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!(%status, body = %body, "Firestore request failed");
    Err(LinkpageError::UpstreamStatus(status))
}
