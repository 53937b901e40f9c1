use crate::error::BlobError;

/// Metadata for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobMeta {
    pub key: String,
    pub size: u64,
}

/// BlobStore holds uploaded attachment files.
///
/// Keys are relative, slash-separated paths such as
/// `devices/42/1718000000000-front-panel.jpg`. Keys that are empty,
/// absolute, or climb out of the store with `..` are rejected.
pub trait BlobStore: Send + Sync {
    /// Store a blob. Overwrites if the key already exists.
    fn put(&self, key: &str, data: &[u8]) -> Result<BlobMeta, BlobError>;

    /// Retrieve a blob. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;
}
