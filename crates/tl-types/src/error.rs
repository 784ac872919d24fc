use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("item id must not be empty")]
    EmptyId,

    #[error("item content must not be empty")]
    EmptyContent,

    #[error("duplicate item id: {0}")]
    DuplicateId(String),

    #[error("malformed wire record: {0}")]
    MalformedRecord(String),
}
