pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use config::{ServiceConfig, StorageBackend, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::ServiceError;
pub use module::Module;
pub use types::{now_millis, now_rfc3339};
