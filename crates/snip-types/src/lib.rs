//! Foundation types for snip.
//!
//! This crate provides the identifier, tag, and duration types used
//! throughout the snip paste store. Every other snip crate depends on
//! `snip-types`.
//!
//! # Key Types
//!
//! - [`PasteId`] — URL-safe random identifier for a paste
//! - [`EditToken`] — longer random secret granting mutation rights
//! - [`Language`] — fixed set of syntax tags carried on versions
//! - [`Theme`] — presentation tag (`dark` / `light`)
//! - [`Ttl`] — time-to-live parsed from a symbolic or general duration string

pub mod error;
pub mod lang;
pub mod theme;
pub mod token;
pub mod ttl;

pub use error::TypeError;
pub use lang::Language;
pub use theme::Theme;
pub use token::{random_token, EditToken, PasteId};
pub use ttl::Ttl;
