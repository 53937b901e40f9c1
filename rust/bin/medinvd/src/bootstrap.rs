//! Bootstrap: open the configured storage backends.

use std::sync::Arc;

use medinv_blob::{BlobStore, FileStore};
use medinv_core::{ServiceConfig, StorageBackend};
use medinv_doc::{DocStore, FileDoc, MemoryDoc};
use tracing::{info, warn};

/// Open the record document and the attachment store.
///
/// The backend is whatever the configuration names; nothing is inferred
/// from the environment.
pub fn open_storage(
    config: &ServiceConfig,
) -> anyhow::Result<(Arc<dyn DocStore>, Arc<dyn BlobStore>)> {
    let doc: Arc<dyn DocStore> = match config.backend {
        StorageBackend::File => {
            let path = config.resolve_records_path();
            if !path.exists() {
                warn!(
                    "record document {} does not exist yet, starting with an empty inventory",
                    path.display()
                );
            }
            Arc::new(
                FileDoc::open(&path)
                    .map_err(|e| anyhow::anyhow!("failed to open record document: {}", e))?,
            )
        }
        StorageBackend::Memory => Arc::new(MemoryDoc::new()),
    };
    info!("Device records: {}", doc.describe());
    if !doc.is_durable() {
        warn!("{} storage selected: device records will not survive a restart", doc.describe());
    }

    let upload_dir = config.resolve_upload_dir();
    let blob: Arc<dyn BlobStore> = Arc::new(
        FileStore::open(&upload_dir)
            .map_err(|e| anyhow::anyhow!("failed to open upload store: {}", e))?,
    );
    info!("Attachments: {}", upload_dir.display());

    Ok((doc, blob))
}
