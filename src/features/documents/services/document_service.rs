use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::documents::models::Document;
use crate::modules::metadata::MetadataStore;
use crate::modules::storage::BlobStore;

/// A document record joined with its blob content
#[derive(Debug)]
pub struct DocumentWithContent {
    pub document: Document,
    pub content: Vec<u8>,
}

/// Service for document ingestion and retrieval
///
/// Stateless between requests; all durable state lives in the two injected
/// stores. Neither pipeline retries a failed store call.
pub struct DocumentService {
    blob_store: Arc<dyn BlobStore>,
    metadata_store: Arc<dyn MetadataStore>,
}

impl DocumentService {
    pub fn new(blob_store: Arc<dyn BlobStore>, metadata_store: Arc<dyn MetadataStore>) -> Self {
        Self {
            blob_store,
            metadata_store,
        }
    }

    /// Ingest a document: write the content blob, then the metadata record.
    ///
    /// Write order is the invariant that keeps records truthful: a record is
    /// only visible once its blob exists. If the metadata write fails after
    /// the blob write succeeded, the blob is deleted again. That compensating
    /// delete is best-effort; when it also fails the orphaned blob is logged
    /// for out-of-band reconciliation and the caller still receives the
    /// metadata-write error.
    pub async fn ingest(
        &self,
        user_id: &str,
        document_type: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Document> {
        let file_size = content.len() as i64;
        let document_id = Uuid::new_v4();
        let s3_bucket = self.blob_store.bucket_name();
        let s3_key = format!("{}/{}/{}_{}", user_id, document_type, document_id, file_name);

        self.blob_store
            .put(&s3_key, content, "application/octet-stream")
            .await
            .map_err(|e| {
                tracing::error!("Blob write failed for '{}': {}", s3_key, e);
                AppError::StorageWrite("Failed to store document content".to_string())
            })?;

        debug!("Document content stored: {}", s3_key);

        let document = Document {
            document_id,
            user_id: user_id.to_string(),
            document_type: document_type.to_string(),
            file_name: file_name.to_string(),
            s3_bucket,
            s3_key: s3_key.clone(),
            upload_date: Utc::now(),
            file_size,
        };

        if let Err(e) = self.metadata_store.put(&document).await {
            tracing::error!("Metadata write failed for document '{}': {}", document_id, e);

            // The blob must not outlive the failed metadata write.
            if let Err(delete_err) = self.blob_store.delete(&s3_key).await {
                warn!(
                    bucket = %document.s3_bucket,
                    key = %s3_key,
                    error = %delete_err,
                    "Orphaned blob left behind: compensating delete failed after metadata write failure"
                );
            }

            return Err(AppError::StorageWrite(
                "Failed to save document metadata".to_string(),
            ));
        }

        info!(
            "Document metadata saved: id={}, key={}, size={}",
            document.document_id, document.s3_key, document.file_size
        );

        Ok(document)
    }

    /// Retrieve the most recent document for an owner and document type.
    ///
    /// A missing metadata record is not-found; a record whose blob cannot be
    /// fetched (the orphan window) is a storage-read error, reported
    /// distinctly.
    pub async fn retrieve(&self, user_id: &str, document_type: &str) -> Result<DocumentWithContent> {
        let document = self
            .metadata_store
            .find_latest(user_id, document_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Metadata query failed for ({}, {}): {}",
                    user_id,
                    document_type,
                    e
                );
                AppError::StorageRead("Failed to query document metadata".to_string())
            })?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        let content = self.blob_store.get(&document.s3_key).await.map_err(|e| {
            tracing::error!("Blob read failed for '{}': {}", document.s3_key, e);
            AppError::StorageRead("Failed to fetch document content".to_string())
        })?;

        Ok(DocumentWithContent { document, content })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;

    use chrono::Duration;

    use super::*;
    use crate::shared::test_helpers::{seed_document, test_stores};

    fn service_with(
        blob: &Arc<crate::shared::test_helpers::InMemoryBlobStore>,
        meta: &Arc<crate::shared::test_helpers::InMemoryMetadataStore>,
    ) -> DocumentService {
        DocumentService::new(
            Arc::clone(blob) as Arc<dyn BlobStore>,
            Arc::clone(meta) as Arc<dyn MetadataStore>,
        )
    }

    #[tokio::test]
    async fn ingest_writes_blob_then_metadata() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        let document = service
            .ingest("user123", "identification", "doc.txt", b"content".to_vec())
            .await
            .unwrap();

        assert_eq!(document.user_id, "user123");
        assert_eq!(document.file_size, 7);
        assert_eq!(
            document.s3_key,
            format!(
                "user123/identification/{}_doc.txt",
                document.document_id
            )
        );
        assert_eq!(
            blob.objects.lock().unwrap().get(&document.s3_key),
            Some(&b"content".to_vec())
        );
        assert_eq!(meta.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generated_document_ids_are_unique() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        let mut seen = HashSet::new();
        for i in 0..10_000 {
            let document = service
                .ingest("user123", "identification", "doc.txt", vec![0u8; 4])
                .await
                .unwrap();
            assert!(
                seen.insert(document.document_id),
                "duplicate document_id after {} ingestions",
                i
            );
        }
    }

    #[tokio::test]
    async fn blob_write_failure_aborts_before_metadata() {
        let (blob, meta) = test_stores();
        blob.fail_put.store(true, Ordering::SeqCst);
        let service = service_with(&blob, &meta);

        let err = service
            .ingest("user123", "identification", "doc.txt", b"content".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StorageWrite(_)));
        assert!(err.to_string().contains("content"));
        assert_eq!(meta.put_calls.load(Ordering::SeqCst), 0);
        assert_eq!(blob.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn metadata_write_failure_deletes_blob() {
        let (blob, meta) = test_stores();
        meta.fail_put.store(true, Ordering::SeqCst);
        let service = service_with(&blob, &meta);

        let err = service
            .ingest("user123", "identification", "doc.txt", b"content".to_vec())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("metadata"));
        assert_eq!(blob.delete_calls.load(Ordering::SeqCst), 1);
        assert!(blob.objects.lock().unwrap().is_empty());
        assert!(meta.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_compensation_still_reports_metadata_error() {
        let (blob, meta) = test_stores();
        meta.fail_put.store(true, Ordering::SeqCst);
        blob.fail_delete.store(true, Ordering::SeqCst);
        let service = service_with(&blob, &meta);

        let err = service
            .ingest("user123", "identification", "doc.txt", b"content".to_vec())
            .await
            .unwrap_err();

        // The original metadata-write error wins over the compensation error.
        assert!(matches!(err, AppError::StorageWrite(_)));
        assert!(err.to_string().contains("metadata"));
        // The orphaned blob is still there.
        assert_eq!(blob.objects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retrieve_round_trips_ingested_content() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        let content = "Este es el contenido de mi documento de prueba"
            .as_bytes()
            .to_vec();
        service
            .ingest(
                "user123",
                "identification",
                "test_document.txt",
                content.clone(),
            )
            .await
            .unwrap();

        let retrieved = service.retrieve("user123", "identification").await.unwrap();
        assert_eq!(retrieved.document.file_name, "test_document.txt");
        assert_eq!(retrieved.content, content);
    }

    #[tokio::test]
    async fn retrieve_returns_most_recent_document() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        let older = seed_document(&blob, &meta, "user123", "identification", "old.txt");
        let newer = seed_document(&blob, &meta, "user123", "identification", "new.txt");
        {
            let mut records = meta.records.lock().unwrap();
            records[0].upload_date = Utc::now() - Duration::seconds(60);
            records[1].upload_date = Utc::now();
        }

        let retrieved = service.retrieve("user123", "identification").await.unwrap();
        assert_eq!(retrieved.document.document_id, newer.document_id);
        assert_ne!(retrieved.document.document_id, older.document_id);
        assert_eq!(retrieved.document.file_name, "new.txt");
    }

    #[tokio::test]
    async fn timestamp_tie_breaks_on_document_id() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        let first = seed_document(&blob, &meta, "user123", "identification", "a.txt");
        let second = seed_document(&blob, &meta, "user123", "identification", "b.txt");
        let shared_ts = Utc::now();
        {
            let mut records = meta.records.lock().unwrap();
            for record in records.iter_mut() {
                record.upload_date = shared_ts;
            }
        }

        let expected = if first.document_id > second.document_id {
            first.document_id
        } else {
            second.document_id
        };
        let retrieved = service.retrieve("user123", "identification").await.unwrap();
        assert_eq!(retrieved.document.document_id, expected);
    }

    #[tokio::test]
    async fn retrieve_filters_by_document_type() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        seed_document(&blob, &meta, "user123", "identification", "id.txt");
        let contract = seed_document(&blob, &meta, "user123", "contract", "contract.txt");

        let retrieved = service.retrieve("user123", "contract").await.unwrap();
        assert_eq!(retrieved.document.document_id, contract.document_id);
    }

    #[tokio::test]
    async fn retrieve_without_records_is_not_found() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        let err = service
            .retrieve("user123", "identification")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn record_without_blob_is_a_storage_read_error() {
        let (blob, meta) = test_stores();
        let service = service_with(&blob, &meta);

        // Simulate the orphan window: record present, blob gone.
        let document = seed_document(&blob, &meta, "user123", "identification", "doc.txt");
        blob.objects.lock().unwrap().remove(&document.s3_key);

        let err = service
            .retrieve("user123", "identification")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StorageRead(_)));
    }

    #[tokio::test]
    async fn metadata_query_failure_is_a_storage_read_error() {
        let (blob, meta) = test_stores();
        meta.fail_query.store(true, Ordering::SeqCst);
        let service = service_with(&blob, &meta);

        let err = service
            .retrieve("user123", "identification")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StorageRead(_)));
        assert!(err.to_string().contains("query"));
    }
}
