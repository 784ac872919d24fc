use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid sync configuration: {0}")]
    InvalidConfig(String),

    #[error("no async runtime available: {0}")]
    NoRuntime(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
