//! Program lookup and recommendation orchestration.
//!
//! Coverage-based scoring is the canonical path; the CIP-SOC crosswalk is
//! consulted only when no published program declares coverage of any gap
//! skill for the assessment's occupation.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gaps::{calculate_skill_gaps, load_assessment, SkillGap};
use crate::matching::scoring::{
    score_by_coverage, score_by_crosswalk, MatchOptions, ProgramCandidate, ProgramMatch,
};
use crate::models::program::{CrosswalkRow, ProgramRow, ProgramSkillRow};

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSummary {
    pub total_gaps: usize,
    pub critical_gaps: usize,
    pub programs_found: usize,
    pub best_match_score: i32,
}

#[derive(Debug, Serialize)]
pub struct Recommendations {
    pub gaps: Vec<SkillGap>,
    pub programs: Vec<ProgramMatch>,
    pub summary: RecommendationSummary,
}

/// Finds ranked programs for a gap list.
///
/// `fallback_soc` enables the crosswalk path when no program teaches any of
/// the gap skills. Zero results is a valid terminal state, not an error.
pub async fn find_programs_for_gaps(
    pool: &PgPool,
    gaps: &[SkillGap],
    fallback_soc: Option<&str>,
    options: &MatchOptions,
) -> Result<Vec<ProgramMatch>, AppError> {
    if gaps.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = load_program_candidates(pool, gaps).await?;
    if !candidates.is_empty() {
        let matches = score_by_coverage(gaps, &candidates, options);
        info!(
            "{} of {} candidate programs meet the {}% threshold",
            matches.len(),
            candidates.len(),
            options.min_match_threshold
        );
        return Ok(matches);
    }

    let Some(soc_code) = fallback_soc else {
        return Ok(Vec::new());
    };

    info!("No programs declare coverage of the gap skills — falling back to crosswalk for {soc_code}");
    let crosswalk = load_crosswalk_entries(pool, soc_code).await?;
    if crosswalk.is_empty() {
        return Ok(Vec::new());
    }

    let cip_codes: Vec<String> = crosswalk.iter().map(|c| c.cip_code.clone()).collect();
    let programs = load_published_programs_by_cip(pool, &cip_codes).await?;

    Ok(score_by_crosswalk(gaps, &programs, &crosswalk, options))
}

/// Combined pipeline: gaps, then ranked programs, then a summary.
pub async fn get_program_recommendations(
    pool: &PgPool,
    assessment_id: Uuid,
    options: &MatchOptions,
) -> Result<Recommendations, AppError> {
    let assessment = load_assessment(pool, assessment_id).await?;
    let soc_code: Option<String> =
        sqlx::query_scalar("SELECT soc_code FROM jobs WHERE id = $1")
            .bind(assessment.job_id)
            .fetch_optional(pool)
            .await?
            .flatten();

    let gaps = calculate_skill_gaps(pool, assessment_id).await?;
    let programs = find_programs_for_gaps(pool, &gaps, soc_code.as_deref(), options).await?;

    let summary = RecommendationSummary {
        total_gaps: gaps.len(),
        critical_gaps: gaps
            .iter()
            .filter(|g| g.importance == crate::models::skill::ImportanceTier::Critical)
            .count(),
        programs_found: programs.len(),
        best_match_score: programs.first().map(|p| p.match_score).unwrap_or(0),
    };

    Ok(Recommendations {
        gaps,
        programs,
        summary,
    })
}

/// Loads published programs (from published providers) that declare coverage
/// of at least one gap skill, grouped per program.
async fn load_program_candidates(
    pool: &PgPool,
    gaps: &[SkillGap],
) -> Result<Vec<ProgramCandidate>, AppError> {
    let gap_skill_ids: Vec<Uuid> = gaps.iter().map(|g| g.skill_id).collect();

    let program_skills = sqlx::query_as::<_, ProgramSkillRow>(
        "SELECT program_id, skill_id, weight FROM program_skills WHERE skill_id = ANY($1)",
    )
    .bind(&gap_skill_ids)
    .fetch_all(pool)
    .await?;

    if program_skills.is_empty() {
        return Ok(Vec::new());
    }

    let mut skills_by_program: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for ps in &program_skills {
        skills_by_program
            .entry(ps.program_id)
            .or_default()
            .push(ps.skill_id);
    }

    let program_ids: Vec<Uuid> = skills_by_program.keys().copied().collect();
    let programs = sqlx::query_as::<_, ProgramRow>(
        r#"
        SELECT p.id, p.name, p.cip_code, p.modality, p.duration_weeks, p.cost_usd, p.location,
               s.name AS provider_name, s.logo_url AS provider_logo_url
        FROM programs p
        JOIN schools s ON s.id = p.school_id
        WHERE p.id = ANY($1) AND p.status = 'published' AND s.is_published = TRUE
        "#,
    )
    .bind(&program_ids)
    .fetch_all(pool)
    .await?;

    Ok(programs
        .into_iter()
        .filter_map(|program| {
            let skill_ids = skills_by_program.remove(&program.id)?;
            Some(ProgramCandidate { program, skill_ids })
        })
        .collect())
}

async fn load_crosswalk_entries(
    pool: &PgPool,
    soc_code: &str,
) -> Result<Vec<CrosswalkRow>, AppError> {
    Ok(sqlx::query_as::<_, CrosswalkRow>(
        "SELECT cip_code, soc_code, match_strength FROM cip_soc_crosswalk WHERE soc_code = $1",
    )
    .bind(soc_code)
    .fetch_all(pool)
    .await?)
}

async fn load_published_programs_by_cip(
    pool: &PgPool,
    cip_codes: &[String],
) -> Result<Vec<ProgramRow>, AppError> {
    Ok(sqlx::query_as::<_, ProgramRow>(
        r#"
        SELECT p.id, p.name, p.cip_code, p.modality, p.duration_weeks, p.cost_usd, p.location,
               s.name AS provider_name, s.logo_url AS provider_logo_url
        FROM programs p
        JOIN schools s ON s.id = p.school_id
        WHERE p.cip_code = ANY($1) AND p.status = 'published' AND s.is_published = TRUE
        "#,
    )
    .bind(cip_codes)
    .fetch_all(pool)
    .await?)
}
