use medinv_blob::BlobError;
use medinv_core::{ServiceError, now_millis};
use tracing::{error, info};

use super::InventoryService;

/// Public path prefix under which stored attachments are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Result of storing one attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAttachment {
    /// Reference path clients put into `ImageUrls`.
    pub file_path: String,
    pub size: u64,
}

impl InventoryService {
    /// Store an uploaded file for `device_id`.
    ///
    /// The blob key is `devices/{device_id}/{millis}-{name}`; the returned
    /// reference path is that key under [`UPLOAD_URL_PREFIX`]. `device_id`
    /// must be a positive SequenceNumber; the device doesn't have to exist
    /// yet.
    pub fn store_attachment(
        &self,
        device_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<StoredAttachment, ServiceError> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(ServiceError::Validation("deviceId is required".to_string()));
        }
        let device_id = device_id
            .parse::<u64>()
            .ok()
            .filter(|&id| id > 0)
            .ok_or_else(|| {
                ServiceError::Validation(format!("invalid deviceId: {:?}", device_id))
            })?;

        let key = format!(
            "devices/{}/{}-{}",
            device_id,
            now_millis(),
            sanitize_file_name(file_name)
        );
        let meta = self.blob.put(&key, data).map_err(|e| match e {
            BlobError::InvalidKey(msg) => {
                ServiceError::Validation(format!("invalid attachment path: {}", msg))
            }
            other => {
                error!("store attachment {}: {}", key, other);
                ServiceError::Storage(other.to_string())
            }
        })?;

        info!("attachment stored: {} ({} bytes)", meta.key, meta.size);
        Ok(StoredAttachment {
            file_path: format!("{}/{}", UPLOAD_URL_PREFIX, meta.key),
            size: meta.size,
        })
    }

    /// Read back an attachment by its key (the reference path without the prefix).
    pub fn fetch_attachment(&self, key: &str) -> Result<Vec<u8>, ServiceError> {
        let not_found = || ServiceError::NotFound(format!("attachment {} not found", key));
        match self.blob.get(key) {
            Ok(Some(data)) => Ok(data),
            Ok(None) | Err(BlobError::InvalidKey(_)) => Err(not_found()),
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }
}

/// Client file name reduced to its last path segment, whitespace runs
/// replaced by `-`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut out = String::with_capacity(base.len());
    let mut in_space = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }

    match out.as_str() {
        "" | "." | ".." => "upload".to_string(),
        _ => out,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use medinv_blob::FileStore;
    use medinv_doc::MemoryDoc;

    use super::*;

    fn make_service() -> (InventoryService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let blob = FileStore::open(&dir.path().join("uploads")).unwrap();
        let svc = InventoryService::new(Arc::new(MemoryDoc::new()), Arc::new(blob));
        (svc, dir)
    }

    #[test]
    fn sanitize_names() {
        assert_eq!(sanitize_file_name("front view.jpg"), "front-view.jpg");
        assert_eq!(sanitize_file_name("a  \t b.png"), "a-b.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\scan 1.png"), "scan-1.png");
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(" x.png"), "-x.png");
    }

    #[test]
    fn store_then_fetch() {
        let (svc, dir) = make_service();
        let stored = svc.store_attachment("42", "front view.jpg", b"jpeg-bytes").unwrap();
        assert!(stored.file_path.starts_with("/uploads/devices/42/"));
        assert!(stored.file_path.ends_with("-front-view.jpg"));
        assert_eq!(stored.size, 10);

        let key = stored.file_path.trim_start_matches("/uploads/");
        assert_eq!(svc.fetch_attachment(key).unwrap(), b"jpeg-bytes");
        assert!(dir.path().join("uploads").join(key).is_file());
    }

    #[test]
    fn blank_device_id_is_rejected() {
        let (svc, _dir) = make_service();
        assert!(matches!(
            svc.store_attachment("  ", "a.png", b"x"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn non_numeric_device_id_is_rejected() {
        let (svc, dir) = make_service();
        for id in ["../..", ".", "7/x", "0", "-3", "abc"] {
            assert!(
                matches!(
                    svc.store_attachment(id, "a.png", b"x"),
                    Err(ServiceError::Validation(_))
                ),
                "deviceId {:?} should be rejected",
                id
            );
        }
        assert!(!dir.path().join("uploads").join("devices").exists());
    }

    #[test]
    fn padded_device_id_is_trimmed() {
        let (svc, _dir) = make_service();
        let stored = svc.store_attachment(" 8 ", "a.png", b"x").unwrap();
        assert!(stored.file_path.starts_with("/uploads/devices/8/"));
    }

    #[test]
    fn fetch_missing_or_invalid_is_not_found() {
        let (svc, _dir) = make_service();
        assert!(matches!(svc.fetch_attachment("devices/1/none.png"), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.fetch_attachment("../secret"), Err(ServiceError::NotFound(_))));
    }
}
