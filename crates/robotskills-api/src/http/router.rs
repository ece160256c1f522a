//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Submissions
        .route(
            "/submissions",
            post(handlers::submission::create_submission)
                .get(handlers::submission::list_submissions),
        )
        .route("/submissions/{id}", get(handlers::submission::get_submission))
        .route(
            "/submissions/{id}/sections/{kind}",
            put(handlers::section::save_section),
        )
        // Workflow transitions
        .route(
            "/submissions/{id}/submit",
            post(handlers::submission::submit_for_review),
        )
        .route(
            "/submissions/{id}/automated-review/complete",
            post(handlers::submission::complete_automated_review),
        )
        .route(
            "/submissions/{id}/decision",
            post(handlers::submission::record_decision),
        )
        .route(
            "/submissions/{id}/withdraw",
            post(handlers::submission::withdraw),
        )
        // History
        .route(
            "/submissions/{id}/reviews",
            get(handlers::submission::list_reviews),
        )
        .route(
            "/submissions/{id}/history",
            get(handlers::submission::list_history),
        )
        // Dry-run validation
        .route(
            "/sections/{kind}/validate",
            post(handlers::section::validate_section),
        )
        // Dashboard stats
        .route("/stats", get(handlers::stats::get_stats));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
