use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Text generation
        .route("/generate-text", post(handlers::generate_text))
        .route("/generate-practice", post(handlers::generate_practice))
        // Typing sessions
        .route("/start-session", post(handlers::start_session))
        .route("/check-typing", post(handlers::check_typing))
        .route("/submit-result", post(handlers::submit_result))
        .route("/history", get(handlers::history))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
