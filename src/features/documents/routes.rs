use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::documents::dtos::MAX_UPLOAD_BODY_BYTES;
use crate::features::documents::handlers::{get_document, route_not_found, upload_document};
use crate::features::documents::services::DocumentService;

/// Create routes for the documents feature
///
/// Any method/path combination outside the two operations falls through to
/// the JSON not-found response, including wrong methods on matched paths.
pub fn routes(service: Arc<DocumentService>) -> Router {
    Router::new()
        .route(
            "/documents",
            post(upload_document)
                .fallback(route_not_found)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .route(
            "/documents/{user_id}/{document_type}",
            get(get_document).fallback(route_not_found),
        )
        .with_state(service)
}
