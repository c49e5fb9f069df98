use snip_codec::CodecError;
use snip_types::TypeError;

/// Errors from paste store operations.
///
/// None of these are retryable by the store itself; all surface to the
/// caller synchronously.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The submitted content was empty after trimming.
    #[error("content is empty")]
    EmptyContent,

    /// The TTL string could not be parsed.
    #[error("invalid ttl: {0:?}")]
    InvalidTtl(String),

    /// Unknown or expired paste id. Deliberately identical for both cases.
    #[error("paste not found")]
    NotFound,

    /// A stored version payload failed to decode. The store only reads
    /// payloads it wrote, so this is an internal invariant violation.
    #[error("corrupt version: {0}")]
    CorruptVersion(#[from] CodecError),
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidTtl(input) => StoreError::InvalidTtl(input),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
