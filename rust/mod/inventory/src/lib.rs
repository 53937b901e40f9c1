pub mod api;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use medinv_core::Module;

use service::InventoryService;

/// Inventory module: medical device records and their attachments.
pub struct InventoryModule {
    service: Arc<InventoryService>,
    max_upload_bytes: usize,
}

impl InventoryModule {
    pub fn new(service: InventoryService, max_upload_bytes: usize) -> Self {
        Self {
            service: Arc::new(service),
            max_upload_bytes,
        }
    }
}

impl Module for InventoryModule {
    fn name(&self) -> &str {
        "inventory"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone(), self.max_upload_bytes)
    }
}
