use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::JobRow;
use crate::state::AppState;
use crate::taxonomy::hybrid::ingest_hybrid_skills;
use crate::taxonomy::ingest::{ingest_onet_skills, IngestSummary};

#[derive(Debug, Default, Deserialize)]
pub struct IngestRequest {
    /// Overrides the job's stored SOC code when present.
    pub soc_code: Option<String>,
}

/// POST /api/v1/admin/jobs/:job_id/skills/ingest
///
/// Standard-occupation path: fetch taxonomy elements, filter, select, and
/// upsert job-skill requirements. A summary with zero writes signals the
/// caller to flag or skip the job.
pub async fn handle_ingest_skills(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestSummary>, AppError> {
    let job = load_job(&state.db, job_id).await?;
    let soc_code = request
        .soc_code
        .or(job.soc_code)
        .ok_or_else(|| AppError::Validation(format!("Job {job_id} has no SOC code")))?;

    let summary = ingest_onet_skills(
        &state.db,
        state.taxonomy.as_ref(),
        &state.denylist,
        job_id,
        &soc_code,
    )
    .await?;

    Ok(Json(summary))
}

/// POST /api/v1/admin/jobs/:job_id/skills/hybrid-ingest
///
/// Featured-role path: pool taxonomy and industry skills, rank with the LLM,
/// upsert the winners.
pub async fn handle_hybrid_ingest_skills(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<IngestSummary>, AppError> {
    let job = load_job(&state.db, job_id).await?;
    let summary = ingest_hybrid_skills(&state.db, &state.llm, &job).await?;
    Ok(Json(summary))
}

async fn load_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT id, title, soc_code, long_desc FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}
