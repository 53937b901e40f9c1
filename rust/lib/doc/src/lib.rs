pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::DocError;
pub use file::FileDoc;
pub use memory::MemoryDoc;
pub use traits::DocStore;
