//! Version payload codec for snip.
//!
//! Historical versions are kept in memory indefinitely, so every version's
//! content is stored zstd-compressed and decompressed on read. Text and code
//! are highly redundant; trading CPU for resident memory is the point.
//!
//! Encoding is deterministic in validity (every encoded payload decodes)
//! but not necessarily byte-identical across calls. Decoding a payload that
//! was not produced by [`encode`] fails with [`CodecError::Corrupt`];
//! callers must surface that failure rather than substitute empty content.

use thiserror::Error;

/// Compression level for version payloads.
const LEVEL: i32 = 3;

/// Errors from encoding or decoding a version payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The compressor itself failed. Internal error, not caller-correctable.
    #[error("compression failed: {0}")]
    Compression(String),

    /// The payload is not a valid encoded version (bad zstd frame or
    /// non-UTF-8 plaintext). Fatal for the read that hit it.
    #[error("corrupt version payload: {0}")]
    Corrupt(String),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Compress text content into an opaque version payload.
pub fn encode(text: &str) -> CodecResult<Vec<u8>> {
    zstd::encode_all(text.as_bytes(), LEVEL).map_err(|e| CodecError::Compression(e.to_string()))
}

/// Decompress a version payload back into text.
pub fn decode(payload: &[u8]) -> CodecResult<String> {
    let raw = zstd::decode_all(payload).map_err(|e| CodecError::Corrupt(e.to_string()))?;
    String::from_utf8(raw).map_err(|e| CodecError::Corrupt(e.to_string()))
}
