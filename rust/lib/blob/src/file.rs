use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::BlobError;
use crate::traits::{BlobMeta, BlobStore};

/// FileStore is a BlobStore backed by the local filesystem.
///
/// Keys are mapped to paths under `base_dir`:
///   key "devices/42/1718000000000-scan.png" → `{base_dir}/devices/42/1718000000000-scan.png`
///
/// Parent directories are created on `put`.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_dir`.
    /// The directory is created if it doesn't exist.
    pub fn open(base_dir: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(base_dir).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a key to a filesystem path under `base_dir`.
    ///
    /// Only plain path segments are accepted, so the result can never
    /// point outside the store.
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() || key.contains('\\') {
            return Err(BlobError::InvalidKey(format!("{:?}", key)));
        }

        let mut path = self.base_dir.clone();
        for component in Path::new(key).components() {
            match component {
                Component::Normal(segment) => path.push(segment),
                Component::CurDir => {}
                _ => return Err(BlobError::InvalidKey(format!("{:?}", key))),
            }
        }

        if path == self.base_dir {
            return Err(BlobError::InvalidKey(format!("{:?}", key)));
        }
        Ok(path)
    }
}

impl BlobStore for FileStore {
    fn put(&self, key: &str, data: &[u8]) -> Result<BlobMeta, BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BlobError::Io(e.to_string()))?;
        }
        fs::write(&path, data).map_err(|e| BlobError::Io(e.to_string()))?;
        debug!("FileStore: stored {} ({} bytes)", key, data.len());
        Ok(BlobMeta {
            key: key.to_string(),
            size: data.len() as u64,
        })
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.resolve(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        let data = fs::read(&path).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Some(data))
    }
}
