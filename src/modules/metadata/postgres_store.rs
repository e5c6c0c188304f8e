use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::core::error::Result;
use crate::features::documents::models::Document;
use crate::modules::metadata::MetadataStore;

/// Postgres-backed metadata store
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn put(&self, document: &Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents
                (document_id, user_id, document_type, file_name, s3_bucket, s3_key, upload_date, file_size)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(document.document_id)
        .bind(&document.user_id)
        .bind(&document.document_type)
        .bind(&document.file_name)
        .bind(&document.s3_bucket)
        .bind(&document.s3_key)
        .bind(document.upload_date)
        .bind(document.file_size)
        .execute(&self.pool)
        .await?;

        debug!("Document record inserted: {}", document.document_id);
        Ok(())
    }

    async fn find_latest(&self, user_id: &str, document_type: &str) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT document_id, user_id, document_type, file_name, s3_bucket, s3_key, upload_date, file_size
            FROM documents
            WHERE user_id = $1 AND document_type = $2
            ORDER BY upload_date DESC, document_id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(document_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }
}
