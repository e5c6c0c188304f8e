use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, ErrorBody, Result};
use crate::core::extractor::AppJson;
use crate::features::documents::dtos::{
    DocumentResponseDto, UploadDocumentDto, UploadDocumentResponseDto,
};
use crate::features::documents::services::DocumentService;

/// Upload a document
///
/// Validates the request, then stores the decoded content in the blob store
/// and the metadata record in the database.
#[utoipa::path(
    post,
    path = "/documents",
    tag = "documents",
    request_body = UploadDocumentDto,
    responses(
        (status = 201, description = "Document uploaded successfully", body = UploadDocumentResponseDto),
        (status = 400, description = "Missing or invalid field, or undecodable content", body = ErrorBody),
        (status = 500, description = "Blob or metadata store failure", body = ErrorBody)
    )
)]
pub async fn upload_document(
    State(service): State<Arc<DocumentService>>,
    AppJson(dto): AppJson<UploadDocumentDto>,
) -> Result<(StatusCode, Json<UploadDocumentResponseDto>)> {
    // All validation happens before any store I/O.
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let content = dto.decode_content()?;

    let document = service
        .ingest(&dto.user_id, &dto.document_type, &dto.file_name, content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadDocumentResponseDto {
            message: "Document uploaded successfully".to_string(),
            document_id: document.document_id,
            user_id: document.user_id,
            document_type: document.document_type,
            file_name: document.file_name,
        }),
    ))
}

/// Retrieve the most recent document for a user and document type
#[utoipa::path(
    get,
    path = "/documents/{user_id}/{document_type}",
    tag = "documents",
    params(
        ("user_id" = String, Path, description = "Identifier of the owning user"),
        ("document_type" = String, Path, description = "Document classification")
    ),
    responses(
        (status = 200, description = "Most recent matching document", body = DocumentResponseDto),
        (status = 400, description = "Empty user_id or document_type segment", body = ErrorBody),
        (status = 404, description = "No matching document", body = ErrorBody),
        (status = 500, description = "Blob or metadata store failure", body = ErrorBody)
    )
)]
pub async fn get_document(
    State(service): State<Arc<DocumentService>>,
    Path((user_id, document_type)): Path<(String, String)>,
) -> Result<Json<DocumentResponseDto>> {
    if user_id.is_empty() || document_type.is_empty() {
        return Err(AppError::BadRequest(
            "user_id and document_type are required".to_string(),
        ));
    }

    let retrieved = service.retrieve(&user_id, &document_type).await?;

    Ok(Json(DocumentResponseDto::from(retrieved)))
}

/// Fallback for unrouted method/path combinations
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
