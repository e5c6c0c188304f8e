use utoipa::{Modify, OpenApi};

use crate::core::error::ErrorBody;
use crate::features::documents::{dtos as documents_dtos, handlers as documents_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        documents_handlers::upload_document,
        documents_handlers::get_document,
    ),
    components(
        schemas(
            documents_dtos::UploadDocumentDto,
            documents_dtos::UploadDocumentResponseDto,
            documents_dtos::DocumentResponseDto,
            ErrorBody,
        )
    ),
    tags(
        (name = "documents", description = "Document upload and retrieval"),
    ),
    info(
        title = "User Documents API",
        version = "0.1.0",
        description = "Document upload and retrieval API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
