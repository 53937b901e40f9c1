use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("storage error: {0}")]
    Storage(String),
}
