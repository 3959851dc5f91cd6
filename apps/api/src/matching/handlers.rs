use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::programs::{get_program_recommendations, Recommendations};
use crate::matching::scoring::MatchOptions;
use crate::matching::tracking::{record_click, record_enrollment, track_recommendation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub min_match_threshold: Option<f64>,
    pub max_results: Option<usize>,
    pub modality: Option<String>,
    pub max_cost: Option<f64>,
}

impl RecommendationQuery {
    fn into_options(self) -> MatchOptions {
        let defaults = MatchOptions::default();
        MatchOptions {
            min_match_threshold: self
                .min_match_threshold
                .unwrap_or(defaults.min_match_threshold),
            max_results: self.max_results.unwrap_or(defaults.max_results),
            preferred_modality: self.modality,
            max_cost: self.max_cost,
        }
    }
}

/// GET /api/v1/assessments/:id/recommendations
///
/// Runs the full pipeline: gap calculation, then program matching. An empty
/// program list with an empty gap list means "fully qualified".
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Path(assessment_id): Path<Uuid>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<Recommendations>, AppError> {
    let options = params.into_options();
    let recommendations = get_program_recommendations(&state.db, assessment_id, &options).await?;
    Ok(Json(recommendations))
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub assessment_id: Uuid,
    pub program_id: Uuid,
    pub match_score: i32,
    pub skills_covered: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub recommendation_id: Uuid,
}

/// POST /api/v1/recommendations/track
pub async fn handle_track_recommendation(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, AppError> {
    let recommendation_id = track_recommendation(
        &state.db,
        request.assessment_id,
        request.program_id,
        request.match_score,
        &request.skills_covered,
    )
    .await?;

    Ok(Json(TrackResponse { recommendation_id }))
}

/// POST /api/v1/recommendations/:id/click
pub async fn handle_record_click(
    State(state): State<AppState>,
    Path(recommendation_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    record_click(&state.db, recommendation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/recommendations/:id/enroll
pub async fn handle_record_enrollment(
    State(state): State<AppState>,
    Path(recommendation_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    record_enrollment(&state.db, recommendation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
