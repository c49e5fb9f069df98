use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all snip endpoints.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handler::health))
        .route("/api/stats", get(handler::stats))
        .route("/api/paste", post(handler::create_paste))
        .route("/api/paste/:id", get(handler::get_paste))
        .route("/api/paste/:id/edit", post(handler::edit_paste))
        .route("/raw/:id", get(handler::raw_paste))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
