use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::DocError;
use crate::traits::DocStore;

/// FileDoc is a DocStore backed by a single file on local disk.
///
/// Each write goes to its own temp file in the same directory, which is
/// then renamed over `path`. A concurrent reader sees either the old
/// document or the new one, and concurrent writers never share a temp file.
pub struct FileDoc {
    path: PathBuf,
    dir: PathBuf,
}

impl FileDoc {
    /// Create a FileDoc for `path`. The parent directory is created if it
    /// doesn't exist; the file itself is not touched until the first write.
    pub fn open(path: &Path) -> Result<Self, DocError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| DocError::Io(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            dir,
        })
    }
}

impl DocStore for FileDoc {
    fn read(&self) -> Result<Option<Vec<u8>>, DocError> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("FileDoc: {:?} does not exist yet", self.path);
                Ok(None)
            }
            Err(e) => Err(DocError::Io(format!("read {:?}: {}", self.path, e))),
        }
    }

    fn write(&self, data: &[u8]) -> Result<(), DocError> {
        // Dropped (and removed) on any error before persist.
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| DocError::Io(format!("create temp file in {:?}: {}", self.dir, e)))?;
        tmp.write_all(data)
            .map_err(|e| DocError::Io(format!("write {:?}: {}", tmp.path(), e)))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| DocError::Io(format!("sync {:?}: {}", tmp.path(), e)))?;
        tmp.persist(&self.path)
            .map_err(|e| DocError::Io(format!("persist {:?}: {}", self.path, e.error)))?;
        debug!("FileDoc: wrote {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
