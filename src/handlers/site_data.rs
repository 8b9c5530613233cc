use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;
use tracing::{error, info};

use crate::types::site_data::{
    DEFAULT_SITE_DATA, HealthResponse, SaveResponse, SiteData, now_iso, stamp_last_updated,
};
use crate::{LinkpageError, router::LinkpageState};

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: now_iso(),
    })
}

/// GET /api/site-data -> the stored document, or the default payload when none exists.
pub async fn get_site_data(State(state): State<LinkpageState>) -> Result<Json<Value>, LinkpageError> {
    let stored = state.store.load().await.inspect_err(|e| {
        error!(error = %e, "Error getting site data");
    })?;

    Ok(Json(match stored {
        Some(data) => Value::Object(data),
        None => DEFAULT_SITE_DATA.clone(),
    }))
}

/// POST /api/site-data -> stamp `lastUpdated` and overwrite the document.
pub async fn save_site_data(
    State(state): State<LinkpageState>,
    payload: Result<Json<SiteData>, JsonRejection>,
) -> Result<Json<SaveResponse>, LinkpageError> {
    let Json(mut data) = payload.inspect_err(|e| {
        info!(error = %e, "rejected site data body");
    })?;
    stamp_last_updated(&mut data, now_iso());

    state.store.save(&data).await.inspect_err(|e| {
        error!(error = %e, "Error saving site data");
    })?;

    info!(fields = data.len(), "site data saved");
    Ok(Json(SaveResponse::saved()))
}
