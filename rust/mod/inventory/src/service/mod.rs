pub mod attachment;
pub mod device;

use std::sync::Arc;

use medinv_blob::BlobStore;
use medinv_doc::DocStore;

use crate::repository::DeviceRepository;
use crate::store::RecordStore;

/// Inventory service: holds the storage backends and provides business logic.
pub struct InventoryService {
    pub(crate) devices: DeviceRepository,
    pub(crate) blob: Arc<dyn BlobStore>,
}

impl InventoryService {
    pub fn new(doc: Arc<dyn DocStore>, blob: Arc<dyn BlobStore>) -> Self {
        Self {
            devices: DeviceRepository::new(RecordStore::new(doc)),
            blob,
        }
    }
}
