//! Document storage for the site data.
//!
//! Layout:
//! - `models.rs`: the document address and the SQLite row mirror
//! - `schema.rs`: SQL DDL for the local SQLite backend
//! - `sqlite.rs`: SQLite-backed store for local development and tests
//! - `firestore.rs`: Firestore REST store used in production
//! - `firestore_value.rs`: JSON <-> Firestore typed value codec

pub mod firestore;
pub mod firestore_value;
pub mod models;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::LinkpageError;
use crate::types::site_data::SiteData;

pub use firestore::FirestoreStore;
pub use models::{DocumentRef, SITE_DATA_DOC};
pub use sqlite::SqliteStore;

/// Whole-document storage for one site-data document.
#[async_trait]
pub trait SiteDataStore: Send + Sync {
    /// `None` when the document has never been written.
    async fn load(&self) -> Result<Option<SiteData>, LinkpageError>;

    /// Replace the document entirely. Last writer wins.
    async fn save(&self, data: &SiteData) -> Result<(), LinkpageError>;

    /// Release pooled resources during shutdown.
    async fn close(&self) {}
}
