//! Ephemeral, versioned paste storage.
//!
//! The store maps random [`PasteId`]s to [`Paste`] records: append-only
//! histories of zstd-compressed [`Version`]s with an absolute expiry
//! timestamp fixed at creation. Everything lives in memory; a background
//! sweeper reclaims expired entries, and every read re-checks expiry itself
//! so visibility never depends on the sweeper having run.
//!
//! # Design Rules
//!
//! 1. Versions are immutable once appended; histories only grow.
//! 2. Reads hand out value copies, never references into the container.
//! 3. Every mutation is one short critical section under the write lock;
//!    an edit's read-compare-append-write is atomic per paste.
//! 4. Expiry is enforced lazily at read time; the sweeper only reclaims
//!    memory.
//! 5. A paste is built whole (first version, edit token and all) before
//!    it becomes visible.
//!
//! [`PasteId`]: snip_types::PasteId

pub mod config;
pub mod error;
pub mod object;
pub mod policy;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use object::{Paste, Version};
pub use policy::can_edit;
pub use store::{CreateRequest, PasteStore};
