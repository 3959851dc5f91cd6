//! Gap calculation — compares a user's measured skill scores against the
//! job's required proficiency thresholds and produces an ordered deficit list.

pub mod handlers;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::{AssessmentRow, AssessmentSkillResultRow};
use crate::models::skill::{ImportanceTier, RequiredSkillRow};

/// Whether a required skill was actually measured in the assessment.
///
/// "Never tested" and "tested and scored zero" are different remediation
/// cases; both default to an effective level of 0 for gap arithmetic, but the
/// distinction is preserved in the serialized gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "score_pct", rename_all = "snake_case")]
pub enum Measurement {
    NotAssessed,
    Scored(f64),
}

impl Measurement {
    pub fn effective_pct(&self) -> f64 {
        match self {
            Measurement::NotAssessed => 0.0,
            Measurement::Scored(pct) => *pct,
        }
    }

    pub fn was_assessed(&self) -> bool {
        matches!(self, Measurement::Scored(_))
    }
}

/// One unmet skill requirement. Derived per request, never stored.
/// Exists iff `user_level < required_level`; `gap` is always positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub skill_category: String,
    pub required_level: i16,
    pub measurement: Measurement,
    pub user_level: f64,
    pub gap: f64,
    pub importance: ImportanceTier,
}

/// Computes the gap list from a job's requirements and one assessment's
/// measured results.
///
/// Ordering: critical before important before helpful, then gap magnitude
/// descending within a tier, then skill name for determinism.
pub fn compute_skill_gaps(
    required: &[RequiredSkillRow],
    results: &[AssessmentSkillResultRow],
) -> Vec<SkillGap> {
    let mut gaps: Vec<SkillGap> = required
        .iter()
        .filter_map(|req| {
            let measurement = results
                .iter()
                .find(|r| r.skill_id == req.skill_id)
                .map(|r| Measurement::Scored(r.score_pct))
                .unwrap_or(Measurement::NotAssessed);

            let user_level = measurement.effective_pct();
            let required_level = req.proficiency_threshold;

            if user_level < required_level as f64 {
                Some(SkillGap {
                    skill_id: req.skill_id,
                    skill_name: req.skill_name.clone(),
                    skill_category: req.skill_category.clone(),
                    required_level,
                    measurement,
                    user_level,
                    gap: required_level as f64 - user_level,
                    importance: ImportanceTier::parse(&req.importance_level),
                })
            } else {
                None
            }
        })
        .collect();

    gaps.sort_by(|a, b| {
        a.importance
            .rank()
            .cmp(&b.importance.rank())
            .then_with(|| {
                b.gap
                    .partial_cmp(&a.gap)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.skill_name.cmp(&b.skill_name))
    });

    gaps
}

/// Loads an assessment's job requirements and measured results, then computes
/// the ordered gap list.
///
/// A missing assessment is a hard NotFound — an empty gap list means "fully
/// qualified" and must never stand in for a failed lookup.
pub async fn calculate_skill_gaps(
    pool: &PgPool,
    assessment_id: Uuid,
) -> Result<Vec<SkillGap>, AppError> {
    let assessment = load_assessment(pool, assessment_id).await?;

    let required = load_required_skills(pool, assessment.job_id).await?;
    let results = load_skill_results(pool, assessment_id).await?;

    let gaps = compute_skill_gaps(&required, &results);
    info!(
        "Assessment {assessment_id}: {} gaps across {} required skills",
        gaps.len(),
        required.len()
    );

    Ok(gaps)
}

pub async fn load_assessment(
    pool: &PgPool,
    assessment_id: Uuid,
) -> Result<AssessmentRow, AppError> {
    sqlx::query_as::<_, AssessmentRow>(
        "SELECT id, user_id, job_id, analyzed_at FROM assessments WHERE id = $1",
    )
    .bind(assessment_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))
}

pub async fn load_required_skills(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<RequiredSkillRow>, AppError> {
    Ok(sqlx::query_as::<_, RequiredSkillRow>(
        r#"
        SELECT js.job_id, js.skill_id, sk.name AS skill_name, sk.category AS skill_category,
               js.importance_level, js.proficiency_threshold, js.weight
        FROM job_skills js
        JOIN skills sk ON sk.id = js.skill_id
        WHERE js.job_id = $1
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}

pub async fn load_skill_results(
    pool: &PgPool,
    assessment_id: Uuid,
) -> Result<Vec<AssessmentSkillResultRow>, AppError> {
    Ok(sqlx::query_as::<_, AssessmentSkillResultRow>(
        "SELECT assessment_id, skill_id, score_pct FROM assessment_skill_results WHERE assessment_id = $1",
    )
    .bind(assessment_id)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(name: &str, tier: &str, threshold: i16) -> RequiredSkillRow {
        RequiredSkillRow {
            job_id: Uuid::new_v4(),
            skill_id: Uuid::new_v4(),
            skill_name: name.to_string(),
            skill_category: "Knowledge".to_string(),
            importance_level: tier.to_string(),
            proficiency_threshold: threshold,
            weight: 0.8,
        }
    }

    fn result_for(req: &RequiredSkillRow, score_pct: f64) -> AssessmentSkillResultRow {
        AssessmentSkillResultRow {
            assessment_id: Uuid::new_v4(),
            skill_id: req.skill_id,
            score_pct,
        }
    }

    #[test]
    fn test_gap_is_exact_threshold_minus_score() {
        let sql = required("SQL", "important", 70);
        let gaps = compute_skill_gaps(&[sql.clone()], &[result_for(&sql, 45.0)]);

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].skill_name, "SQL");
        assert_eq!(gaps[0].required_level, 70);
        assert_eq!(gaps[0].user_level, 45.0);
        assert_eq!(gaps[0].gap, 25.0);
    }

    #[test]
    fn test_meeting_threshold_produces_no_gap() {
        let sql = required("SQL", "important", 70);
        let gaps = compute_skill_gaps(&[sql.clone()], &[result_for(&sql, 70.0)]);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_gap_always_positive() {
        let reqs = vec![
            required("A", "critical", 80),
            required("B", "important", 70),
            required("C", "helpful", 60),
        ];
        let results = vec![
            result_for(&reqs[0], 79.5),
            result_for(&reqs[1], 0.0),
        ];
        let gaps = compute_skill_gaps(&reqs, &results);
        assert_eq!(gaps.len(), 3);
        assert!(gaps.iter().all(|g| g.gap > 0.0));
    }

    #[test]
    fn test_missing_result_defaults_to_not_assessed() {
        let reqs = vec![required("Networking", "critical", 80)];
        let gaps = compute_skill_gaps(&reqs, &[]);

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].measurement, Measurement::NotAssessed);
        assert_eq!(gaps[0].user_level, 0.0);
        assert_eq!(gaps[0].gap, 80.0);
    }

    #[test]
    fn test_not_assessed_distinct_from_measured_zero() {
        let reqs = vec![
            required("Untested", "helpful", 60),
            required("Failed", "helpful", 60),
        ];
        let results = vec![result_for(&reqs[1], 0.0)];
        let gaps = compute_skill_gaps(&reqs, &results);

        let untested = gaps.iter().find(|g| g.skill_name == "Untested").unwrap();
        let failed = gaps.iter().find(|g| g.skill_name == "Failed").unwrap();

        assert!(!untested.measurement.was_assessed());
        assert!(failed.measurement.was_assessed());
        // Same effective gap, different serialized measurement.
        assert_eq!(untested.gap, failed.gap);
        assert_ne!(
            serde_json::to_value(untested.measurement).unwrap(),
            serde_json::to_value(failed.measurement).unwrap()
        );
    }

    #[test]
    fn test_ordering_tier_then_magnitude() {
        let reqs = vec![
            required("Small Critical", "critical", 80),
            required("Big Helpful", "helpful", 60),
            required("Big Critical", "critical", 80),
            required("Mid Important", "important", 70),
        ];
        let results = vec![
            result_for(&reqs[0], 75.0), // critical, gap 5
            result_for(&reqs[1], 5.0),  // helpful, gap 55
            result_for(&reqs[2], 20.0), // critical, gap 60
            result_for(&reqs[3], 40.0), // important, gap 30
        ];
        let gaps = compute_skill_gaps(&reqs, &results);

        let names: Vec<&str> = gaps.iter().map(|g| g.skill_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Big Critical", "Small Critical", "Mid Important", "Big Helpful"]
        );
    }

    #[test]
    fn test_magnitude_non_increasing_within_tier() {
        let reqs: Vec<RequiredSkillRow> = (0..5)
            .map(|i| required(&format!("Skill {i}"), "important", 70))
            .collect();
        let results: Vec<AssessmentSkillResultRow> = reqs
            .iter()
            .enumerate()
            .map(|(i, r)| result_for(r, (i as f64) * 13.0))
            .collect();
        let gaps = compute_skill_gaps(&reqs, &results);

        for window in gaps.windows(2) {
            assert!(window[0].gap >= window[1].gap);
        }
    }

    #[test]
    fn test_zero_requirements_means_zero_gaps() {
        let gaps = compute_skill_gaps(&[], &[]);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_tie_broken_by_name_for_determinism() {
        let reqs = vec![
            required("Zebra Handling", "important", 70),
            required("Alpha Protocols", "important", 70),
        ];
        let gaps = compute_skill_gaps(&reqs, &[]);
        assert_eq!(gaps[0].skill_name, "Alpha Protocols");
        assert_eq!(gaps[1].skill_name, "Zebra Handling");
    }
}
