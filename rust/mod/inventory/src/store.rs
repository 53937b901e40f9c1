//! Record store: reads and writes the device collection as one JSON document.

use std::sync::Arc;

use medinv_core::ServiceError;
use medinv_doc::DocStore;
use tracing::{debug, error};

use crate::model::DeviceRecord;

/// RecordStore loads and saves the whole device collection.
///
/// The document is a JSON array of records, pretty-printed with a
/// two-space indent. A document that doesn't exist yet loads as an empty
/// collection; any other read or decode failure is a storage error.
#[derive(Clone)]
pub struct RecordStore {
    doc: Arc<dyn DocStore>,
}

impl RecordStore {
    pub fn new(doc: Arc<dyn DocStore>) -> Self {
        Self { doc }
    }

    pub fn load(&self) -> Result<Vec<DeviceRecord>, ServiceError> {
        let bytes = match self.doc.read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("no record document at {}, starting empty", self.doc.describe());
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("read records from {}: {}", self.doc.describe(), e);
                return Err(ServiceError::Storage(e.to_string()));
            }
        };

        // An empty file is what a fresh deployment usually ships with.
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Vec::new());
        }

        let records: Vec<DeviceRecord> = serde_json::from_slice(&bytes).map_err(|e| {
            error!("decode records from {}: {}", self.doc.describe(), e);
            ServiceError::Storage(format!("corrupt record document: {}", e))
        })?;
        debug!("loaded {} records from {}", records.len(), self.doc.describe());
        Ok(records)
    }

    pub fn save(&self, records: &[DeviceRecord]) -> Result<(), ServiceError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.doc.write(&json).map_err(|e| {
            error!("write records to {}: {}", self.doc.describe(), e);
            ServiceError::Storage(e.to_string())
        })?;
        debug!("saved {} records to {}", records.len(), self.doc.describe());
        Ok(())
    }
}
