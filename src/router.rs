use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::{CORS_ORIGINS, MAX_UPLOAD_BYTES, MULTIPART_OVERHEAD_BYTES};
use crate::db::SiteDataStore;
use crate::handlers::site_data::{get_site_data, health_handler, save_site_data};
use crate::handlers::upload::{upload_avatar, upload_background};
use crate::service::ImageUploader;

/// Process-wide clients shared by every request.
#[derive(Clone)]
pub struct LinkpageState {
    pub store: Arc<dyn SiteDataStore>,
    pub uploader: Arc<dyn ImageUploader>,
}

impl LinkpageState {
    pub fn new(store: Arc<dyn SiteDataStore>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self { store, uploader }
    }
}

pub fn linkpage_router(state: LinkpageState) -> Router {
    let uploads = Router::new()
        .route("/api/upload/avatar", post(upload_avatar))
        .route("/api/upload/background", post(upload_background))
        .layer(DefaultBodyLimit::max(
            MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/site-data", get(get_site_data).post(save_site_data))
        .merge(uploads)
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let origins = CORS_ORIGINS.map(HeaderValue::from_static);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
