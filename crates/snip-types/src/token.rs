use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Produce a URL-safe random token of `2 * byte_len` lowercase hex characters.
///
/// Bytes come from the operating system's secure random source. If that
/// source is momentarily unavailable the token is derived from a
/// high-resolution clock reading instead: weaker, but generation never
/// fails and never returns an empty string.
pub fn random_token(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => hex::encode(&bytes),
        Err(_) => clock_token(byte_len),
    }
}

/// Fallback token derived from the current time in nanoseconds.
fn clock_token(byte_len: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let seed = nanos.to_le_bytes();
    let bytes: Vec<u8> = (0..byte_len)
        .map(|i| seed[i % seed.len()] ^ (i as u8).wrapping_mul(0x9d))
        .collect();
    hex::encode(&bytes)
}

/// Unique identifier for a paste, assigned at creation.
///
/// Short enough to read in a URL path segment; uniqueness among live pastes
/// is enforced by the store at insert time.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PasteId(String);

impl PasteId {
    /// Random bytes per generated id (hex doubles this in characters).
    pub const BYTE_LEN: usize = 8;

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(random_token(Self::BYTE_LEN))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasteId({})", self.0)
    }
}

impl fmt::Display for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PasteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PasteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Secret token granting mutation rights to an editable paste.
///
/// Longer than a [`PasteId`]: possession of this token is the only
/// authorization check, so it has to resist guessing for the paste's
/// lifetime.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditToken(String);

impl EditToken {
    /// Random bytes per generated token.
    pub const BYTE_LEN: usize = 16;

    /// Generate a fresh random token.
    pub fn generate() -> Self {
        Self(random_token(Self::BYTE_LEN))
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Redacted: edit tokens must not leak into logs.
impl fmt::Debug for EditToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EditToken(..)")
    }
}

impl From<&str> for EditToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
