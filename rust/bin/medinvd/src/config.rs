//! Server configuration: `/etc/medinv/<name>.toml` or an explicit path.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [storage]
//! backend = "file"        # or "memory"
//! data_dir = "./data"
//! # records_path = "./data/MDDB.json"
//! # upload_dir = "./data/uploads"
//!
//! [upload]
//! max_bytes = 26214400
//! ```

use std::path::{Path, PathBuf};

use medinv_core::{DEFAULT_MAX_UPLOAD_BYTES, ServiceConfig, StorageBackend};
use serde::Deserialize;

const CONFIG_DIR: &str = "/etc/medinv";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: String,
    pub records_path: Option<String>,
    pub upload_dir: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: "./data".to_string(),
            records_path: None,
            upload_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// A bare name resolves to `/etc/medinv/<name>.toml`; anything that
    /// looks like a path (contains `/` or `.`) is used as given.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Command-line flags win over the file.
    pub fn apply_overrides(
        &mut self,
        listen: Option<String>,
        data_dir: Option<String>,
        backend: Option<StorageBackend>,
    ) {
        if let Some(listen) = listen {
            self.server.listen = listen;
        }
        if let Some(data_dir) = data_dir {
            self.storage.data_dir = data_dir;
        }
        if let Some(backend) = backend {
            self.storage.backend = backend;
        }
    }

    pub fn verify(&self) -> anyhow::Result<()> {
        if self.server.listen.trim().is_empty() {
            anyhow::bail!("server.listen is empty in configuration.");
        }
        if self.storage.data_dir.trim().is_empty() {
            anyhow::bail!("storage.data_dir is empty in configuration.");
        }
        if self.upload.max_bytes == 0 {
            anyhow::bail!("upload.max_bytes must be greater than zero.");
        }
        Ok(())
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            records_path: self.storage.records_path.as_ref().map(PathBuf::from),
            upload_dir: self.storage.upload_dir.as_ref().map(PathBuf::from),
            backend: self.storage.backend,
            max_upload_bytes: self.upload.max_bytes,
            listen: self.server.listen.clone(),
        }
    }
}
