pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::applications::handlers;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Platforms and direct submission
        .route("/api/v1/platforms", get(handlers::handle_list_platforms))
        .route(
            "/api/v1/platforms/:platform/applications",
            post(handlers::handle_create_application),
        )
        .route(
            "/api/v1/applications/bulk",
            post(handlers::handle_bulk_create),
        )
        // Job listings and the application form
        .route("/api/v1/jobs", get(jobs::handle_catalog_overview))
        .route("/api/v1/jobs/:platform", get(jobs::handle_platform_jobs))
        .route(
            "/api/v1/jobs/:platform/:job_id/apply",
            post(jobs::handle_apply),
        )
        .with_state(state)
}
