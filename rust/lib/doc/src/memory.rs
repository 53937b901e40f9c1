use std::sync::RwLock;

use crate::error::DocError;
use crate::traits::DocStore;

/// MemoryDoc keeps the document in process memory.
///
/// It starts empty and nothing survives a restart. Tests use it, and the
/// server uses it only when the operator asks for the memory backend.
#[derive(Default)]
pub struct MemoryDoc {
    data: RwLock<Option<Vec<u8>>>,
}

impl MemoryDoc {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocStore for MemoryDoc {
    fn read(&self) -> Result<Option<Vec<u8>>, DocError> {
        let data = self
            .data
            .read()
            .map_err(|e| DocError::Storage(e.to_string()))?;
        Ok(data.clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), DocError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| DocError::Storage(e.to_string()))?;
        *data = Some(bytes.to_vec());
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
