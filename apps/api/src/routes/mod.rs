pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::gaps::handlers as gap_handlers;
use crate::intelligence::handlers as intelligence_handlers;
use crate::matching::handlers as match_handlers;
use crate::state::AppState;
use crate::taxonomy::handlers as taxonomy_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Admin skill ingestion
        .route(
            "/api/v1/admin/jobs/:job_id/skills/ingest",
            post(taxonomy_handlers::handle_ingest_skills),
        )
        .route(
            "/api/v1/admin/jobs/:job_id/skills/hybrid-ingest",
            post(taxonomy_handlers::handle_hybrid_ingest_skills),
        )
        .route(
            "/api/v1/admin/jobs/:job_id/skills/weighting",
            get(intelligence_handlers::handle_get_skill_weighting),
        )
        // Gap calculation
        .route(
            "/api/v1/assessments/:id/gaps",
            get(gap_handlers::handle_get_gaps),
        )
        // Program recommendations
        .route(
            "/api/v1/assessments/:id/recommendations",
            get(match_handlers::handle_get_recommendations),
        )
        .route(
            "/api/v1/recommendations/track",
            post(match_handlers::handle_track_recommendation),
        )
        .route(
            "/api/v1/recommendations/:id/click",
            post(match_handlers::handle_record_click),
        )
        .route(
            "/api/v1/recommendations/:id/enroll",
            post(match_handlers::handle_record_enrollment),
        )
        .with_state(state)
}
