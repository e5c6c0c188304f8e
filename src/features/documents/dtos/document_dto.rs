use base64::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::documents::services::DocumentWithContent;

/// Maximum decoded document size in bytes (10MB)
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// Request body cap for the upload route. Base64 inflates content by 4/3,
/// plus headroom for the JSON envelope and metadata fields.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_DOCUMENT_SIZE + MAX_DOCUMENT_SIZE / 3 + 1024 * 1024;

/// Upload document request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UploadDocumentDto {
    /// Identifier of the uploading user
    #[schema(example = "user123")]
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,

    /// Document classification (e.g. "identification")
    #[schema(example = "identification")]
    #[validate(length(min = 1, message = "document_type is required"))]
    pub document_type: String,

    /// Original file name, kept verbatim
    #[schema(example = "test_document.txt")]
    #[validate(length(min = 1, message = "file_name is required"))]
    pub file_name: String,

    /// Base64-encoded file content
    #[validate(length(min = 1, message = "file_content is required"))]
    pub file_content: String,
}

impl UploadDocumentDto {
    /// Decode the transport-encoded content. Decoding failure is a
    /// validation error; no store call has happened at this point.
    pub fn decode_content(&self) -> Result<Vec<u8>> {
        BASE64_STANDARD.decode(&self.file_content).map_err(|_| {
            AppError::Validation("Invalid file_content - must be base64 encoded".to_string())
        })
    }
}

/// Response DTO for a successful upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadDocumentResponseDto {
    pub message: String,
    pub document_id: Uuid,
    pub user_id: String,
    pub document_type: String,
    pub file_name: String,
}

/// Response DTO for document retrieval, content re-encoded for transport
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponseDto {
    pub document_id: Uuid,
    pub user_id: String,
    pub document_type: String,
    pub file_name: String,
    /// Base64-encoded file content
    pub file_content: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: i64,
}

impl From<DocumentWithContent> for DocumentResponseDto {
    fn from(retrieved: DocumentWithContent) -> Self {
        let DocumentWithContent { document, content } = retrieved;
        Self {
            document_id: document.document_id,
            user_id: document.user_id,
            document_type: document.document_type,
            file_name: document.file_name,
            file_content: BASE64_STANDARD.encode(content),
            upload_date: document.upload_date,
            file_size: document.file_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_content_accepts_valid_base64() {
        let dto = UploadDocumentDto {
            user_id: "user123".to_string(),
            document_type: "identification".to_string(),
            file_name: "doc.txt".to_string(),
            file_content: BASE64_STANDARD.encode(b"hello"),
        };
        assert_eq!(dto.decode_content().unwrap(), b"hello");
    }

    #[test]
    fn decode_content_rejects_invalid_base64() {
        let dto = UploadDocumentDto {
            user_id: "user123".to_string(),
            document_type: "identification".to_string(),
            file_name: "doc.txt".to_string(),
            file_content: "!!! not base64 !!!".to_string(),
        };
        let err = dto.decode_content().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn empty_fields_fail_validation() {
        let dto = UploadDocumentDto {
            user_id: "".to_string(),
            document_type: "identification".to_string(),
            file_name: "doc.txt".to_string(),
            file_content: "aGVsbG8=".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
