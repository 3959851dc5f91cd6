use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gaps::{calculate_skill_gaps, SkillGap};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GapListResponse {
    pub assessment_id: Uuid,
    pub gaps: Vec<SkillGap>,
    pub total_gaps: usize,
    /// Required skills the assessment never measured, as opposed to measured
    /// and failed. These may warrant a retake rather than remediation.
    pub not_assessed: usize,
}

/// GET /api/v1/assessments/:id/gaps
///
/// Returns the ordered gap list for a completed assessment. An empty list is
/// the "fully qualified" success case; a missing assessment is a 404.
pub async fn handle_get_gaps(
    State(state): State<AppState>,
    Path(assessment_id): Path<Uuid>,
) -> Result<Json<GapListResponse>, AppError> {
    let gaps = calculate_skill_gaps(&state.db, assessment_id).await?;
    let total_gaps = gaps.len();
    let not_assessed = gaps.iter().filter(|g| !g.measurement.was_assessed()).count();

    Ok(Json(GapListResponse {
        assessment_id,
        gaps,
        total_gaps,
        not_assessed,
    }))
}
