use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snip_codec::CodecResult;
use snip_types::{EditToken, Language, PasteId, Theme};

/// One immutable historical snapshot of a paste's content.
///
/// The payload is zstd-compressed and never mutated after creation;
/// histories are append-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Compressed content bytes.
    pub payload: Vec<u8>,
    /// Syntax tag at the time this version was written.
    pub language: Language,
    /// Display name of the editor who produced this version; may be empty.
    pub author: String,
    /// When this version was produced.
    pub created_at: DateTime<Utc>,
}

impl Version {
    /// Build a version by compressing `content`.
    pub fn new(
        content: &str,
        language: Language,
        author: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> CodecResult<Self> {
        Ok(Self {
            payload: snip_codec::encode(content)?,
            language,
            author: author.into(),
            created_at,
        })
    }

    /// Decompress this version's content.
    pub fn content(&self) -> CodecResult<String> {
        snip_codec::decode(&self.payload)
    }
}

/// A stored paste: metadata plus its append-only version history.
///
/// `versions` is never empty (creation always produces version 1) and
/// grows without bound for long-lived, frequently edited pastes: accepted
/// behavior, there is no cap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paste {
    /// Unique identifier, immutable for the paste's lifetime.
    pub id: PasteId,
    /// Syntax tag mirroring the latest version.
    pub language: Language,
    /// Presentation tag chosen at creation; mutable on edit paths only
    /// through the store.
    pub theme: Theme,
    /// Absolute expiry. The paste is absent once `now` passes this,
    /// whether or not the sweeper has physically removed it. Fixed at
    /// creation; editing never extends it.
    pub expires_at: DateTime<Utc>,
    /// Whether the paste accepts edits at all. Immutable.
    pub editable: bool,
    /// Secret edit token; present iff `editable`. Immutable once set.
    pub edit_key: Option<EditToken>,
    /// Most recent editor's display name; may be empty.
    pub author: String,
    /// Append-only history, insertion order = chronological order.
    pub versions: Vec<Version>,
    pub created_at: DateTime<Utc>,
    /// Advances on every accepted mutation.
    pub updated_at: DateTime<Utc>,
}

impl Paste {
    /// The latest version.
    pub fn current_version(&self) -> &Version {
        self.versions.last().expect("paste always has at least one version")
    }

    /// Number of versions in the history.
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Whether the paste is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
