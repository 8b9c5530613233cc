use crate::db::SiteDataStore;
use crate::db::models::{DbDocument, DocumentRef};
use crate::db::schema::SQLITE_INIT;
use crate::error::LinkpageError;
use crate::types::site_data::SiteData;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    doc: DocumentRef,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, doc: DocumentRef) -> Self {
        Self { pool, doc }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str, doc: DocumentRef) -> Result<Self, LinkpageError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self::new(pool, doc);
        store.init_schema().await?;
        info!(database_url = %database_url, document = %doc.path(), "sqlite store ready");
        Ok(store)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), LinkpageError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn get(&self) -> Result<Option<DbDocument>, LinkpageError> {
        let row = sqlx::query(
            r#"SELECT collection, id, body, updated_at
               FROM documents WHERE collection = ? AND id = ?"#,
        )
        .bind(self.doc.collection)
        .bind(self.doc.id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Upsert by `(collection, id)`, replacing the whole body.
    pub async fn put(&self, body: &SiteData) -> Result<(), LinkpageError> {
        let body_json = serde_json::to_string(body)?;
        let updated_at = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET
                body=excluded.body,
                updated_at=excluded.updated_at
            "#,
        )
        .bind(self.doc.collection)
        .bind(self.doc.id)
        .bind(body_json)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<DbDocument, LinkpageError> {
        let collection: String = row.try_get("collection")?;
        let id: String = row.try_get("id")?;
        let body: String = row.try_get("body")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbDocument {
            collection,
            id,
            body,
            updated_at,
        })
    }
}

#[async_trait]
impl SiteDataStore for SqliteStore {
    async fn load(&self) -> Result<Option<SiteData>, LinkpageError> {
        let Some(doc) = self.get().await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&doc.body)?))
    }

    async fn save(&self, data: &SiteData) -> Result<(), LinkpageError> {
        self.put(data).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
