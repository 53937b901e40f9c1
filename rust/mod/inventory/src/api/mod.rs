pub mod device;
pub mod upload;


use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;

use medinv_core::ServiceError;

use crate::service::InventoryService;

/// Shared application state.
pub type AppState = Arc<InventoryService>;

/// Build the inventory API router.
///
/// `max_upload_bytes` caps a single attachment upload request.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(device::routes())
        .merge(upload::routes(max_upload_bytes))
        .with_state(state)
}

/// Identity from a path segment. Anything but a positive integer names
/// no record.
pub(crate) fn parse_identity(raw: &str) -> Result<u64, ServiceError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| ServiceError::NotFound(format!("device {} not found", raw)))
}

/// Malformed request bodies are the client's fault.
pub(crate) fn bad_json(rejection: JsonRejection) -> ServiceError {
    ServiceError::Validation(format!("invalid request body: {}", rejection.body_text()))
}
