use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Address of a single document: `<collection>/<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef {
    pub collection: &'static str,
    pub id: &'static str,
}

impl DocumentRef {
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

/// The one document this service reads and writes.
pub const SITE_DATA_DOC: DocumentRef = DocumentRef {
    collection: "site-data",
    id: "main",
};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbDocument {
    pub collection: String,
    pub id: String,
    /// JSON object, serialized as text.
    pub body: String,
    pub updated_at: DateTime<Utc>,
}
