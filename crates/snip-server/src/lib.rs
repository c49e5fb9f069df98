//! HTTP API for the snip paste store.
//!
//! A thin axum layer over [`snip_store::PasteStore`]: JSON create/view/edit
//! endpoints, raw text views, and a stats endpoint. The store holds every
//! invariant; this crate only parses requests, resolves the edit token from
//! the `?key=` query parameter, and maps errors to status codes.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::AppState;
pub use router::build_router;
pub use server::SnipServer;
