//! In-memory counting fakes for the two store interfaces.
//!
//! Each fake records how many times it was called and can be flipped into a
//! failure mode per operation, so tests can assert both "no store call
//! happened" and partial-failure behavior.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use chrono::Utc;
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::documents::models::Document;
#[cfg(test)]
use crate::modules::metadata::MetadataStore;
#[cfg(test)]
use crate::modules::storage::BlobStore;

#[cfg(test)]
pub const TEST_BUCKET: &str = "user-documents-bucket";

#[cfg(test)]
#[derive(Default)]
pub struct InMemoryBlobStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_put: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_delete: AtomicBool,
    pub put_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

#[cfg(test)]
#[async_trait]
impl BlobStore for InMemoryBlobStore {
    fn bucket_name(&self) -> String {
        TEST_BUCKET.to_string()
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected blob put failure".to_string()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected blob get failure".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("no object at key '{}'", key)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "injected blob delete failure".to_string(),
            ));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct InMemoryMetadataStore {
    pub records: Mutex<Vec<Document>>,
    pub fail_put: AtomicBool,
    pub fail_query: AtomicBool,
    pub put_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
}

#[cfg(test)]
#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put(&self, document: &Document) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "injected metadata put failure".to_string(),
            ));
        }
        self.records.lock().unwrap().push(document.clone());
        Ok(())
    }

    async fn find_latest(&self, user_id: &str, document_type: &str) -> Result<Option<Document>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "injected metadata query failure".to_string(),
            ));
        }
        // Same total order as the Postgres store: upload_date, then
        // document_id, both descending.
        let newest = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.document_type == document_type)
            .max_by_key(|r| (r.upload_date, r.document_id))
            .cloned();
        Ok(newest)
    }
}

#[cfg(test)]
pub fn test_stores() -> (Arc<InMemoryBlobStore>, Arc<InMemoryMetadataStore>) {
    (
        Arc::new(InMemoryBlobStore::default()),
        Arc::new(InMemoryMetadataStore::default()),
    )
}

/// Insert a record and matching blob directly into the fakes, bypassing the
/// ingestion pipeline. Returns the seeded record.
#[cfg(test)]
pub fn seed_document(
    blob: &Arc<InMemoryBlobStore>,
    meta: &Arc<InMemoryMetadataStore>,
    user_id: &str,
    document_type: &str,
    file_name: &str,
) -> Document {
    let document_id = Uuid::new_v4();
    let document = Document {
        document_id,
        user_id: user_id.to_string(),
        document_type: document_type.to_string(),
        file_name: file_name.to_string(),
        s3_bucket: TEST_BUCKET.to_string(),
        s3_key: format!("{}/{}/{}_{}", user_id, document_type, document_id, file_name),
        upload_date: Utc::now(),
        file_size: file_name.len() as i64,
    };
    blob.objects
        .lock()
        .unwrap()
        .insert(document.s3_key.clone(), file_name.as_bytes().to_vec());
    meta.records.lock().unwrap().push(document.clone());
    document
}
