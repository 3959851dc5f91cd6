//! Skill ingestion — turns an occupation's taxonomy elements into a curated,
//! de-duplicated, size-bounded set of job-skill requirements.
//!
//! Selection is deliberately lopsided: domain knowledge differentiates
//! competence far better than generic abilities, so knowledge gets the bulk
//! of the slots and abilities the highest importance bar.

use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::ImportanceTier;
use crate::taxonomy::client::{ElementCategory, TaxonomyElement, TaxonomyProvider};
use crate::taxonomy::filters::DenyList;

/// Total number of requirements to target per job.
pub const TARGET_SKILL_COUNT: usize = 15;

/// Share of the target allocated to each category before the final re-sort.
const CATEGORY_SHARES: &[(ElementCategory, f64)] = &[
    (ElementCategory::Knowledge, 0.80),
    (ElementCategory::Ability, 0.15),
    (ElementCategory::Skill, 0.05),
];

/// One requirement ready to be written, derived from a selected element.
#[derive(Debug, Clone)]
pub struct PlannedRequirement {
    pub element: TaxonomyElement,
    pub tier: ImportanceTier,
    pub proficiency_threshold: i16,
    pub weight: f64,
}

/// Outcome counts for one ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub soc_code: String,
    pub fetched: usize,
    pub assessable: usize,
    pub selected: usize,
    pub written: usize,
}

/// Fetches all three element categories, absorbing per-category failures.
///
/// A category that fails or returns nothing contributes zero elements —
/// ingestion proceeds with whichever categories succeeded. Callers detect the
/// all-failed case from the summary's zero counts, not from an error.
pub async fn fetch_all_categories(
    provider: &dyn TaxonomyProvider,
    soc_code: &str,
) -> Vec<TaxonomyElement> {
    let mut elements = Vec::new();
    for category in ElementCategory::ALL {
        match provider.fetch_elements(soc_code, category).await {
            Ok(mut batch) => elements.append(&mut batch),
            Err(e) => {
                warn!(
                    "Taxonomy fetch failed for {soc_code} {}: {e} — continuing with zero elements",
                    category.as_str()
                );
            }
        }
    }
    elements
}

/// Applies the per-category importance floors, the deny-list, and the
/// weighted slot allocation, returning at most `TARGET_SKILL_COUNT` elements
/// sorted by importance descending.
pub fn select_assessable_elements(
    elements: Vec<TaxonomyElement>,
    deny: &DenyList,
) -> Vec<TaxonomyElement> {
    let floored: Vec<TaxonomyElement> = elements
        .into_iter()
        .filter(|e| e.importance >= e.category.importance_floor())
        .collect();
    let assessable = deny.filter_assessable(floored);

    // Per-category top slice, then a re-sorted union truncated to the target.
    let mut selected: Vec<TaxonomyElement> = Vec::new();
    for (category, share) in CATEGORY_SHARES {
        let slots = (TARGET_SKILL_COUNT as f64 * share).round() as usize;
        let mut bucket: Vec<TaxonomyElement> = assessable
            .iter()
            .filter(|e| e.category == *category)
            .cloned()
            .collect();
        sort_by_importance(&mut bucket);
        bucket.truncate(slots);
        selected.extend(bucket);
    }

    sort_by_importance(&mut selected);
    selected.truncate(TARGET_SKILL_COUNT);
    selected
}

/// Importance descending; name ascending for a stable, deterministic order.
fn sort_by_importance(elements: &mut [TaxonomyElement]) {
    elements.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Derives tier, threshold, and weight for each selected element.
pub fn plan_requirements(selected: Vec<TaxonomyElement>) -> Vec<PlannedRequirement> {
    selected
        .into_iter()
        .map(|element| {
            let tier = ImportanceTier::from_importance(element.importance);
            PlannedRequirement {
                proficiency_threshold: tier.proficiency_threshold(),
                // Normalize the 1-5 source scale to 0-1.
                weight: element.importance / 5.0,
                tier,
                element,
            }
        })
        .collect()
}

/// Runs the full ingestion pipeline for one job.
///
/// Idempotent: re-running with identical taxonomy responses upserts the same
/// final `job_skills` state. Zero requirements written is not an error here —
/// the caller decides whether to flag the job.
pub async fn ingest_onet_skills(
    pool: &PgPool,
    provider: &dyn TaxonomyProvider,
    deny: &DenyList,
    job_id: Uuid,
    soc_code: &str,
) -> Result<IngestSummary, AppError> {
    info!("Ingesting taxonomy skills for job {job_id} (SOC {soc_code})");

    let fetched = fetch_all_categories(provider, soc_code).await;
    let fetched_count = fetched.len();

    let assessable_count = fetched
        .iter()
        .filter(|e| {
            e.importance >= e.category.importance_floor() && deny.is_assessable(&e.name)
        })
        .count();

    let selected = select_assessable_elements(fetched, deny);
    let planned = plan_requirements(selected);
    let selected_count = planned.len();

    let mut written = 0;
    for requirement in &planned {
        let skill_id = find_or_create_skill(pool, &requirement.element).await?;
        let source = json!({
            "source": "ONET_API",
            "category": requirement.element.category.as_str(),
            "importance": requirement.element.importance,
            "validated": true,
        });
        upsert_job_skill(
            pool,
            job_id,
            skill_id,
            requirement.tier,
            requirement.proficiency_threshold,
            requirement.weight,
            &source,
        )
        .await?;
        written += 1;
    }

    if written == 0 {
        warn!("No skill requirements written for job {job_id} (SOC {soc_code})");
    } else {
        info!("Wrote {written} skill requirements for job {job_id}");
    }

    Ok(IngestSummary {
        soc_code: soc_code.to_string(),
        fetched: fetched_count,
        assessable: assessable_count,
        selected: selected_count,
        written,
    })
}

/// Looks up a skill by its taxonomy id, creating it on first encounter.
pub async fn find_or_create_skill(
    pool: &PgPool,
    element: &TaxonomyElement,
) -> Result<Uuid, AppError> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM skills WHERE onet_id = $1")
        .bind(&element.id)
        .fetch_optional(pool)
        .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO skills (id, name, description, category, source, onet_id, onet_importance, is_assessable)
        VALUES ($1, $2, $3, $4, 'ONET', $5, $6, TRUE)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&element.name)
    .bind(&element.description)
    .bind(element.category.skill_category_label())
    .bind(&element.id)
    .bind(element.importance)
    .fetch_one(pool)
    .await?;

    info!("Created skill '{}' ({})", element.name, id);
    Ok(id)
}

/// Upserts one job-skill requirement keyed on (job_id, skill_id).
pub async fn upsert_job_skill(
    pool: &PgPool,
    job_id: Uuid,
    skill_id: Uuid,
    tier: ImportanceTier,
    proficiency_threshold: i16,
    weight: f64,
    source: &serde_json::Value,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO job_skills (job_id, skill_id, importance_level, proficiency_threshold, weight, onet_data_source)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (job_id, skill_id) DO UPDATE SET
            importance_level = EXCLUDED.importance_level,
            proficiency_threshold = EXCLUDED.proficiency_threshold,
            weight = EXCLUDED.weight,
            onet_data_source = EXCLUDED.onet_data_source
        "#,
    )
    .bind(job_id)
    .bind(skill_id)
    .bind(tier.as_str())
    .bind(proficiency_threshold)
    .bind(weight)
    .bind(source)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::client::ElementCategory;

    fn element(name: &str, category: ElementCategory, importance: f64) -> TaxonomyElement {
        TaxonomyElement {
            id: format!("el-{name}"),
            name: name.to_string(),
            description: format!("{name} description"),
            importance,
            category,
        }
    }

    fn knowledge(name: &str, importance: f64) -> TaxonomyElement {
        element(name, ElementCategory::Knowledge, importance)
    }

    #[test]
    fn test_importance_floors_applied_per_category() {
        let deny = DenyList::bundled();
        let selected = select_assessable_elements(
            vec![
                knowledge("Economics and Accounting", 3.0), // at the knowledge floor
                element("Programming", ElementCategory::Skill, 3.4), // below skill floor
                element("Problem Solving", ElementCategory::Ability, 3.9), // below ability floor
            ],
            &deny,
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Economics and Accounting");
    }

    #[test]
    fn test_denylisted_element_never_survives() {
        let deny = DenyList::bundled();
        let selected = select_assessable_elements(
            vec![
                element("Reading Comprehension", ElementCategory::Skill, 4.0),
                knowledge("Relational Database Concepts", 4.2),
            ],
            &deny,
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Relational Database Concepts");
    }

    #[test]
    fn test_slot_allocation_totals_target() {
        // 12 knowledge + 2 ability + 1 skill slots.
        let deny = DenyList::bundled();
        let mut elements = Vec::new();
        for i in 0..20 {
            elements.push(knowledge(&format!("Knowledge Area {i:02}"), 5.0 - i as f64 * 0.05));
        }
        for i in 0..5 {
            elements.push(element(
                &format!("Ability Area {i}"),
                ElementCategory::Ability,
                4.9 - i as f64 * 0.05,
            ));
        }
        for i in 0..5 {
            elements.push(element(
                &format!("Skill Area {i}"),
                ElementCategory::Skill,
                4.8 - i as f64 * 0.05,
            ));
        }

        let selected = select_assessable_elements(elements, &deny);
        assert_eq!(selected.len(), TARGET_SKILL_COUNT);

        let count = |cat: ElementCategory| selected.iter().filter(|e| e.category == cat).count();
        assert_eq!(count(ElementCategory::Knowledge), 12);
        assert_eq!(count(ElementCategory::Ability), 2);
        assert_eq!(count(ElementCategory::Skill), 1);
    }

    #[test]
    fn test_selection_sorted_by_importance_descending() {
        let deny = DenyList::bundled();
        let selected = select_assessable_elements(
            vec![
                knowledge("Mathematics", 3.2),
                knowledge("Computers and Electronics", 4.7),
                knowledge("Engineering and Technology", 4.0),
            ],
            &deny,
        );
        let importances: Vec<f64> = selected.iter().map(|e| e.importance).collect();
        assert_eq!(importances, vec![4.7, 4.0, 3.2]);
    }

    #[test]
    fn test_selection_is_deterministic_on_ties() {
        let deny = DenyList::bundled();
        let run = |order_flipped: bool| {
            let mut elements = vec![
                knowledge("Physics", 4.0),
                knowledge("Chemistry", 4.0),
            ];
            if order_flipped {
                elements.reverse();
            }
            select_assessable_elements(elements, &deny)
                .into_iter()
                .map(|e| e.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(false), run(true));
        assert_eq!(run(false), vec!["Chemistry", "Physics"]);
    }

    #[test]
    fn test_empty_input_selects_nothing() {
        let deny = DenyList::bundled();
        assert!(select_assessable_elements(vec![], &deny).is_empty());
    }

    #[test]
    fn test_plan_maps_tiers_and_thresholds() {
        let planned = plan_requirements(vec![
            knowledge("Medicine and Dentistry", 4.6),
            knowledge("Biology", 3.8),
            knowledge("Sociology and Anthropology", 3.1),
        ]);
        assert_eq!(planned[0].tier, ImportanceTier::Critical);
        assert_eq!(planned[0].proficiency_threshold, 80);
        assert_eq!(planned[1].tier, ImportanceTier::Important);
        assert_eq!(planned[1].proficiency_threshold, 70);
        assert_eq!(planned[2].tier, ImportanceTier::Helpful);
        assert_eq!(planned[2].proficiency_threshold, 60);
    }

    #[test]
    fn test_plan_normalizes_weight_to_unit_scale() {
        let planned = plan_requirements(vec![knowledge("Mathematics", 4.0)]);
        assert!((planned[0].weight - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_selection_idempotent_for_identical_input() {
        let deny = DenyList::bundled();
        let input = || {
            vec![
                knowledge("Computers and Electronics", 4.7),
                knowledge("Mathematics", 4.0),
                element("Programming", ElementCategory::Skill, 3.9),
            ]
        };
        let a = select_assessable_elements(input(), &deny);
        let b = select_assessable_elements(input(), &deny);
        assert_eq!(a, b);
    }
}
