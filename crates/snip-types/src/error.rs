use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid ttl: {0:?}")]
    InvalidTtl(String),
}
