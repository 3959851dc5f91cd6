//! LLM-assisted skill ranking for featured roles.
//!
//! Standard occupations take the deterministic taxonomy path; featured roles
//! blend taxonomy and industry skill pools, then let the LLM pick the most
//! relevant subset. A failed LLM call degrades to a deterministic
//! source-priority ranking rather than blocking ingestion.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::intelligence::prompts::{SKILL_RANKING_PROMPT_TEMPLATE, SKILL_RANKING_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::skill::{ImportanceTier, JobRow, SkillRow};

/// Upper bound on skills returned by either ranking path.
pub const MAX_RANKED_SKILLS: usize = 15;

/// Vendor names excluded from standard-occupation ranking. Too specific to be
/// universally applicable.
const VENDOR_SPECIFIC_PATTERNS: &[&str] = &[
    "Amazon", "AWS", "Microsoft", "Google", "Oracle", "SAP",
    "Salesforce", "Adobe", "IBM", "Cisco", "VMware",
    "ServiceNow", "Workday", "Tableau", "PowerBI",
];

/// A skill under consideration for ranking.
#[derive(Debug, Clone)]
pub struct CandidateSkill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub source: String,
}

impl From<SkillRow> for CandidateSkill {
    fn from(row: SkillRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            source: row.source,
        }
    }
}

/// One ranked skill with its assigned tier.
#[derive(Debug, Clone, Serialize)]
pub struct RankedSkill {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub source: String,
    pub relevance_score: u32,
    pub importance_level: ImportanceTier,
    pub reasoning: String,
}

#[derive(Debug, Deserialize)]
struct RawRankedSkill {
    skill_index: usize,
    #[serde(default)]
    skill_name: String,
    relevance_score: u32,
    #[serde(default)]
    reasoning: String,
    importance_level: ImportanceTier,
}

/// Drops vendor-specific skills and versioned product names, keeping broad
/// universal skills.
pub fn filter_broad_candidates(candidates: Vec<CandidateSkill>) -> Vec<CandidateSkill> {
    candidates
        .into_iter()
        .filter(|skill| {
            let name_lower = skill.name.to_lowercase();
            let vendor_specific = VENDOR_SPECIFIC_PATTERNS
                .iter()
                .any(|vendor| name_lower.contains(&vendor.to_lowercase()));
            !vendor_specific && !has_version_number(&skill.name)
        })
        .collect()
}

/// True when the name embeds a version like "9.0" — a product release, not a
/// transferable skill.
fn has_version_number(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.windows(3).any(|w| {
        w[1] == b'.' && w[0].is_ascii_digit() && w[2].is_ascii_digit()
    })
}

/// Ranks candidate skills for a job via the LLM, degrading to a
/// source-priority ranking when the call fails.
pub async fn rank_skills_with_llm(
    llm: &LlmClient,
    job: &JobRow,
    candidates: &[CandidateSkill],
) -> Vec<RankedSkill> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let skill_list = candidates
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{i}. {} ({}, {})", s.name, s.category, s.source))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = SKILL_RANKING_PROMPT_TEMPLATE
        .replace("{job_title}", &job.title)
        .replace("{soc_code}", job.soc_code.as_deref().unwrap_or("unknown"))
        .replace(
            "{job_description}",
            job.long_desc.as_deref().unwrap_or("Standard occupation"),
        )
        .replace("{candidate_count}", &candidates.len().to_string())
        .replace("{skill_list}", &skill_list);

    match llm
        .call_json::<Vec<RawRankedSkill>>(&prompt, SKILL_RANKING_SYSTEM)
        .await
    {
        Ok(ranked) => map_llm_ranking(ranked, candidates),
        Err(e) => {
            warn!("LLM skill ranking failed for job {}: {e} — using fallback", job.id);
            fallback_ranking(candidates)
        }
    }
}

/// Maps LLM output back onto the candidate list, dropping entries whose index
/// does not resolve.
fn map_llm_ranking(ranked: Vec<RawRankedSkill>, candidates: &[CandidateSkill]) -> Vec<RankedSkill> {
    ranked
        .into_iter()
        .filter_map(|raw| {
            let candidate = candidates.get(raw.skill_index)?;
            Some(RankedSkill {
                skill_id: candidate.id,
                skill_name: if raw.skill_name.is_empty() {
                    candidate.name.clone()
                } else {
                    raw.skill_name
                },
                source: candidate.source.clone(),
                relevance_score: raw.relevance_score.min(100),
                importance_level: raw.importance_level,
                reasoning: raw.reasoning,
            })
        })
        .take(MAX_RANKED_SKILLS)
        .collect()
}

/// Deterministic ranking by source priority: taxonomy-validated skills first.
fn fallback_ranking(candidates: &[CandidateSkill]) -> Vec<RankedSkill> {
    let mut ordered: Vec<&CandidateSkill> = candidates.iter().collect();
    ordered.sort_by(|a, b| {
        let priority = |s: &CandidateSkill| if s.source == "ONET" { 0 } else { 1 };
        priority(a).cmp(&priority(b)).then_with(|| a.name.cmp(&b.name))
    });

    ordered
        .into_iter()
        .take(MAX_RANKED_SKILLS)
        .map(|skill| {
            let validated = skill.source == "ONET";
            RankedSkill {
                skill_id: skill.id,
                skill_name: skill.name.clone(),
                source: skill.source.clone(),
                relevance_score: if validated { 80 } else { 70 },
                importance_level: if validated {
                    ImportanceTier::Important
                } else {
                    ImportanceTier::Helpful
                },
                reasoning: "Fallback matching (AI unavailable)".to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, source: &str) -> CandidateSkill {
        CandidateSkill {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "Software Skill".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_vendor_specific_skills_excluded() {
        let filtered = filter_broad_candidates(vec![
            candidate("Amazon S3", "LIGHTCAST"),
            candidate("Microsoft Azure", "LIGHTCAST"),
            candidate("SQL", "LIGHTCAST"),
        ]);
        let names: Vec<&str> = filtered.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SQL"]);
    }

    #[test]
    fn test_versioned_product_names_excluded() {
        let filtered = filter_broad_candidates(vec![
            candidate("Angular 2.0", "LIGHTCAST"),
            candidate("Python", "LIGHTCAST"),
        ]);
        let names: Vec<&str> = filtered.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python"]);
    }

    #[test]
    fn test_version_detection() {
        assert!(has_version_number("Oracle 12.2 Administration"));
        assert!(!has_version_number("Web 2 Design"));
        assert!(!has_version_number("Networking"));
    }

    #[test]
    fn test_fallback_prioritizes_taxonomy_source() {
        let ranked = fallback_ranking(&[
            candidate("Industry Skill", "LIGHTCAST"),
            candidate("Validated Skill", "ONET"),
        ]);
        assert_eq!(ranked[0].skill_name, "Validated Skill");
        assert_eq!(ranked[0].relevance_score, 80);
        assert_eq!(ranked[0].importance_level, ImportanceTier::Important);
        assert_eq!(ranked[1].relevance_score, 70);
        assert_eq!(ranked[1].importance_level, ImportanceTier::Helpful);
    }

    #[test]
    fn test_fallback_never_exceeds_cap() {
        let candidates: Vec<CandidateSkill> = (0..30)
            .map(|i| candidate(&format!("Skill {i:02}"), "LIGHTCAST"))
            .collect();
        assert_eq!(fallback_ranking(&candidates).len(), MAX_RANKED_SKILLS);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let candidates = vec![
            candidate("Beta", "LIGHTCAST"),
            candidate("Alpha", "LIGHTCAST"),
        ];
        let a: Vec<String> = fallback_ranking(&candidates)
            .into_iter()
            .map(|r| r.skill_name)
            .collect();
        let b: Vec<String> = fallback_ranking(&candidates)
            .into_iter()
            .map(|r| r.skill_name)
            .collect();
        assert_eq!(a, b);
        assert_eq!(a, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_llm_ranking_drops_invalid_indices() {
        let candidates = vec![candidate("SQL", "ONET")];
        let ranked = map_llm_ranking(
            vec![
                RawRankedSkill {
                    skill_index: 0,
                    skill_name: "SQL".to_string(),
                    relevance_score: 95,
                    reasoning: "Core data skill".to_string(),
                    importance_level: ImportanceTier::Critical,
                },
                RawRankedSkill {
                    skill_index: 7,
                    skill_name: "Phantom".to_string(),
                    relevance_score: 90,
                    reasoning: String::new(),
                    importance_level: ImportanceTier::Helpful,
                },
            ],
            &candidates,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].skill_name, "SQL");
    }

    #[test]
    fn test_llm_ranking_clamps_relevance_to_100() {
        let candidates = vec![candidate("SQL", "ONET")];
        let ranked = map_llm_ranking(
            vec![RawRankedSkill {
                skill_index: 0,
                skill_name: String::new(),
                relevance_score: 250,
                reasoning: String::new(),
                importance_level: ImportanceTier::Important,
            }],
            &candidates,
        );
        assert_eq!(ranked[0].relevance_score, 100);
        // Empty name falls back to the candidate's name.
        assert_eq!(ranked[0].skill_name, "SQL");
    }
}
