//! Storage module for document content
//!
//! Provides the blob store capability interface and its MinIO/S3-compatible
//! implementation. The interface is injected into services so tests can
//! substitute in-memory fakes.

mod minio_client;

use async_trait::async_trait;

use crate::core::error::Result;

pub use minio_client::MinIOClient;

/// Capability interface over the blob store.
///
/// Objects are addressed by key within the single bucket the client is bound
/// to. `delete` is best-effort from the caller's perspective: callers may
/// choose to ignore its failure.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Name of the bucket this store writes into.
    fn bucket_name(&self) -> String;

    /// Write object content at `key`.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Fetch object content at `key`. A missing object is an error, not an
    /// empty result; callers that need not-found semantics resolve them
    /// through the metadata store first.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Delete the object at `key`.
    async fn delete(&self, key: &str) -> Result<()>;
}
