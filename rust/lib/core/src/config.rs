use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// Where the device record document lives.
///
/// Always chosen explicitly by configuration; never inferred from the
/// deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON document on local disk. Durable across restarts.
    #[default]
    File,
    /// Process memory only. Starts empty and is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "unknown storage backend {:?} (expected \"file\" or \"memory\")",
                other
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::File => f.write_str("file"),
            StorageBackend::Memory => f.write_str("memory"),
        }
    }
}

/// Resolved runtime configuration handed to storage initialization.
///
/// The server binary builds this from its TOML file and CLI flags.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root directory for persisted state.
    pub data_dir: Option<PathBuf>,

    /// Path to the device record document.
    /// Defaults to `{data_dir}/MDDB.json` if not specified.
    pub records_path: Option<PathBuf>,

    /// Directory for uploaded attachments.
    /// Defaults to `{data_dir}/uploads` if not specified.
    pub upload_dir: Option<PathBuf>,

    /// Record document backend.
    pub backend: StorageBackend,

    /// Maximum accepted request body for uploads, in bytes.
    pub max_upload_bytes: usize,

    /// Listen address for the HTTP server.
    pub listen: String,
}

/// 25 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            records_path: None,
            upload_dir: None,
            backend: StorageBackend::File,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the record document path, falling back to `{data_dir}/MDDB.json`.
    pub fn resolve_records_path(&self) -> PathBuf {
        self.records_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("MDDB.json"))
    }

    /// Resolve the attachment directory, falling back to `{data_dir}/uploads`.
    pub fn resolve_upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("uploads"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
