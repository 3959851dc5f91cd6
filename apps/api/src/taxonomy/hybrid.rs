//! Hybrid skill ingestion for featured roles.
//!
//! Blends taxonomy-validated skills with current industry skills, then ranks
//! the combined pool with the LLM. Standard occupations should use the plain
//! taxonomy path in `ingest` instead.

use std::collections::HashMap;

use serde_json::json;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::intelligence::ranking::{
    filter_broad_candidates, rank_skills_with_llm, CandidateSkill,
};
use crate::llm_client::LlmClient;
use crate::models::skill::JobRow;
use crate::taxonomy::ingest::{upsert_job_skill, IngestSummary};

/// SOC major-group prefix to industry skill categories.
const SOC_TO_CATEGORIES: &[(&str, &[&str])] = &[
    ("11", &["Business Skill", "Management Skill", "Leadership Skill"]),
    ("13", &["Business Skill", "Financial Skill", "Analytical Skill"]),
    ("15", &["Software Skill", "IT Skill", "Specialized Skill", "Technical Skill"]),
    ("17", &["Engineering Skill", "Technical Skill", "Specialized Skill"]),
    ("19", &["Science Skill", "Research Skill", "Analytical Skill"]),
    ("21", &["Communication Skill", "Creative Skill"]),
    ("23", &["Legal Skill", "Analytical Skill"]),
    ("25", &["Education Skill", "Communication Skill"]),
    ("27", &["Design Skill", "Creative Skill", "Technical Skill"]),
    ("29", &["Healthcare Skill", "Medical Skill", "Clinical Skill"]),
    ("31", &["Healthcare Support Skill", "Patient Care Skill"]),
    ("33", &["Security Skill", "Law Enforcement Skill"]),
    ("35", &["Food Service Skill", "Hospitality Skill"]),
    ("37", &["Maintenance Skill", "Technical Skill"]),
    ("39", &["Customer Service Skill", "Personal Care Skill"]),
    ("41", &["Sales Skill", "Communication Skill", "Business Skill"]),
    ("43", &["Administrative Skill", "Office Skill", "Organizational Skill"]),
    ("45", &["Agricultural Skill", "Environmental Skill"]),
    ("47", &["Construction Skill", "Trade Skill", "Technical Skill"]),
    ("49", &["Installation Skill", "Repair Skill", "Technical Skill"]),
    ("51", &["Production Skill", "Manufacturing Skill", "Technical Skill"]),
    ("53", &["Transportation Skill", "Logistics Skill", "Operations Skill"]),
];

/// Maximum industry candidates after vendor filtering.
const INDUSTRY_CANDIDATE_CAP: usize = 25;

/// Industry skill categories for an occupation's SOC major group.
pub fn categories_for_soc(soc_code: &str) -> &'static [&'static str] {
    let prefix = soc_code.get(0..2).unwrap_or_default();
    SOC_TO_CATEGORIES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, categories)| *categories)
        .unwrap_or(&["Specialized Skill"])
}

/// Runs the hybrid pipeline: candidate pooling, LLM ranking, and upserts.
pub async fn ingest_hybrid_skills(
    pool: &PgPool,
    llm: &LlmClient,
    job: &JobRow,
) -> Result<IngestSummary, AppError> {
    let soc_code = job.soc_code.clone().unwrap_or_default();
    info!("Hybrid skill ingestion for job '{}' (SOC {soc_code})", job.title);

    let taxonomy_pool = load_taxonomy_candidates(pool).await?;
    let industry_pool = load_industry_candidates(pool, &soc_code).await?;
    let fetched = taxonomy_pool.len() + industry_pool.len();

    // Dedupe by lowercase name; taxonomy-validated entries win.
    let mut by_name: HashMap<String, CandidateSkill> = HashMap::new();
    for candidate in industry_pool.into_iter().chain(taxonomy_pool) {
        by_name.insert(candidate.name.to_lowercase(), candidate);
    }
    let mut candidates: Vec<CandidateSkill> = by_name.into_values().collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    let assessable = candidates.len();

    let ranked = rank_skills_with_llm(llm, job, &candidates).await;
    let selected = ranked.len();

    let mut written = 0;
    for skill in &ranked {
        let source = json!({
            "source": skill.source,
            "relevance": skill.relevance_score,
            "reasoning": skill.reasoning,
            "ai_matched": true,
        });
        upsert_job_skill(
            pool,
            job.id,
            skill.skill_id,
            skill.importance_level,
            skill.importance_level.proficiency_threshold(),
            skill.relevance_score as f64 / 100.0,
            &source,
        )
        .await?;
        written += 1;
    }

    info!("Hybrid ingestion wrote {written} skill requirements for job {}", job.id);

    Ok(IngestSummary {
        soc_code,
        fetched,
        assessable,
        selected,
        written,
    })
}

/// Taxonomy-validated skills already present in the skills table.
async fn load_taxonomy_candidates(pool: &PgPool) -> Result<Vec<CandidateSkill>, AppError> {
    let rows = sqlx::query_as::<_, crate::models::skill::SkillRow>(
        "SELECT * FROM skills WHERE source = 'ONET' AND is_assessable = TRUE LIMIT 10",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(CandidateSkill::from).collect())
}

/// Broad industry skills matching the occupation's category profile, with
/// vendor-specific and versioned product names filtered out.
async fn load_industry_candidates(
    pool: &PgPool,
    soc_code: &str,
) -> Result<Vec<CandidateSkill>, AppError> {
    let categories: Vec<String> = categories_for_soc(soc_code)
        .iter()
        .map(|c| c.to_string())
        .collect();

    let rows = sqlx::query_as::<_, crate::models::skill::SkillRow>(
        r#"
        SELECT * FROM skills
        WHERE source = 'LIGHTCAST' AND is_assessable = TRUE AND category = ANY($1)
        ORDER BY name
        LIMIT 100
        "#,
    )
    .bind(&categories)
    .fetch_all(pool)
    .await?;

    let mut broad = filter_broad_candidates(rows.into_iter().map(CandidateSkill::from).collect());
    broad.truncate(INDUSTRY_CANDIDATE_CAP);
    Ok(broad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_for_computer_occupations() {
        let categories = categories_for_soc("15-1252");
        assert!(categories.contains(&"Software Skill"));
        assert!(categories.contains(&"IT Skill"));
    }

    #[test]
    fn test_categories_for_healthcare() {
        let categories = categories_for_soc("29-2055");
        assert!(categories.contains(&"Clinical Skill"));
    }

    #[test]
    fn test_unknown_prefix_defaults_to_specialized() {
        assert_eq!(categories_for_soc("99-0000"), &["Specialized Skill"]);
        assert_eq!(categories_for_soc(""), &["Specialized Skill"]);
    }
}
