//! Metadata module for document records
//!
//! Provides the metadata store capability interface and its Postgres
//! implementation. Like the blob store, the interface is injected into
//! services so tests can substitute counting fakes.

mod postgres_store;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::documents::models::Document;

pub use postgres_store::PgMetadataStore;

/// Capability interface over the metadata store.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Persist a document record, keyed by `(user_id, document_id)`.
    async fn put(&self, document: &Document) -> Result<()>;

    /// Newest record for the given owner and document type, ordered by
    /// `upload_date` descending with `document_id` descending as tie-break.
    async fn find_latest(&self, user_id: &str, document_type: &str) -> Result<Option<Document>>;
}
