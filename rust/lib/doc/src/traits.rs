use crate::error::DocError;

/// DocStore holds exactly one document as raw bytes.
///
/// Every write replaces the whole document. Readers never see a partially
/// written document. The caller owns the encoding.
pub trait DocStore: Send + Sync {
    /// Read the document. Returns None if it has never been written.
    fn read(&self) -> Result<Option<Vec<u8>>, DocError>;

    /// Replace the document.
    fn write(&self, data: &[u8]) -> Result<(), DocError>;

    /// Whether the document survives a process restart.
    fn is_durable(&self) -> bool;

    /// Human-readable location, used in log lines.
    fn describe(&self) -> String;
}
