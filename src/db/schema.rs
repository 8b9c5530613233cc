//! SQL DDL for the local document store.

/// SQLite schema with:
/// - one row per document, keyed by `(collection, id)`
/// - `body` holding the whole JSON object as text
/// - `updated_at` stored as RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);
"#;
