use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Dashboard / generator
        .route("/", get(handlers::dashboard))
        .route("/links", get(handlers::list_links).post(handlers::create_link))
        .route("/links/:id", get(handlers::get_link))
        // Public submission form
        .route("/message/:subdomain", post(handlers::submit_message))
        // Owner inbox
        .route("/messages/:link_id", get(handlers::get_inbox))
        // Local sign-in label
        .route(
            "/session",
            get(handlers::get_session)
                .post(handlers::sign_in)
                .delete(handlers::sign_out),
        )
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
