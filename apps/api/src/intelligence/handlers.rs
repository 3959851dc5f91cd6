use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gaps::load_required_skills;
use crate::intelligence::prompts::{build_assessment_context, AssessmentContext};
use crate::intelligence::{
    calculate_dynamic_difficulty, calculate_skill_weighting, market_intelligence, CompanyContext,
    CompanySize, SkillWeighting,
};
use crate::models::skill::JobRow;
use crate::state::AppState;

/// Company-specific importance default when no employer profile is attached.
const NEUTRAL_COMPANY_WEIGHT: f64 = 3.0;
/// Historical success-rate default until enough assessments accumulate.
const DEFAULT_PERFORMANCE_CORRELATION: f64 = 0.75;

const DEFAULT_REGION: &str = "Tampa-St. Petersburg";

#[derive(Debug, Serialize)]
pub struct SkillWeightingEntry {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub difficulty_score: u32,
    pub weighting: SkillWeighting,
    /// Preview of the layered prompt the assessment generator will receive.
    pub context_preview: String,
}

#[derive(Debug, Serialize)]
pub struct SkillWeightingResponse {
    pub job_id: Uuid,
    pub soc_code: String,
    pub skills: Vec<SkillWeightingEntry>,
}

/// GET /api/v1/admin/jobs/:job_id/skills/weighting
///
/// Admin visibility into how each required skill will be weighted and
/// calibrated during assessment generation.
pub async fn handle_get_skill_weighting(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<SkillWeightingResponse>, AppError> {
    let job = load_job(&state.db, job_id).await?;
    let soc_code = job.soc_code.unwrap_or_default();

    let market = market_intelligence(&soc_code, DEFAULT_REGION);
    let company = CompanyContext::default();

    let required = load_required_skills(&state.db, job_id).await?;
    let skills = required
        .into_iter()
        .map(|req| {
            // Stored weight is the importance normalized to 0-1; recover the
            // source 1-5 scale for calibration.
            let onet_importance = req.weight * 5.0;

            let difficulty_score = calculate_dynamic_difficulty(
                onet_importance,
                market.current_demand,
                company.role_level,
                CompanySize::Medium,
            );
            let weighting = calculate_skill_weighting(
                onet_importance,
                market.current_demand,
                NEUTRAL_COMPANY_WEIGHT,
                DEFAULT_PERFORMANCE_CORRELATION,
            );
            let context_preview = build_assessment_context(&AssessmentContext {
                soc_code: &soc_code,
                skill_name: &req.skill_name,
                onet_importance,
                market: &market,
                company: &company,
            });

            SkillWeightingEntry {
                skill_id: req.skill_id,
                skill_name: req.skill_name,
                difficulty_score,
                weighting,
                context_preview,
            }
        })
        .collect();

    Ok(Json(SkillWeightingResponse {
        job_id,
        soc_code,
        skills,
    }))
}

async fn load_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT id, title, soc_code, long_desc FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}
