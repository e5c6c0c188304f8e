use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata record for an uploaded document
///
/// Created exactly once at successful ingestion, never updated in place.
/// The blob at `(s3_bucket, s3_key)` is written before this record exists;
/// a record therefore always points at a stored blob, except when a
/// compensating delete itself failed and left an orphan.
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub document_id: Uuid,
    pub user_id: String,
    pub document_type: String,
    pub file_name: String,
    pub s3_bucket: String,
    pub s3_key: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: i64,
}
