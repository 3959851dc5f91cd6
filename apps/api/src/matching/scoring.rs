//! Program match scoring.
//!
//! The canonical strategy scores each program by weighted coverage of the gap
//! skills it teaches. When no published program declares coverage of any gap
//! skill, the CIP-SOC crosswalk supplies a coarser fallback score keyed on
//! match strength alone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gaps::SkillGap;
use crate::models::program::{CrosswalkRow, MatchStrength, ProgramRow};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Caller-supplied matching constraints.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Minimum match score (0–100) a program must reach to be returned.
    pub min_match_threshold: f64,
    pub max_results: usize,
    pub preferred_modality: Option<String>,
    pub max_cost: Option<f64>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_match_threshold: 60.0,
            max_results: 10,
            preferred_modality: None,
            max_cost: None,
        }
    }
}

/// A gap skill a program nominally addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveredSkill {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub gap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDetails {
    pub modality: String,
    pub duration_weeks: Option<i32>,
    pub cost_usd: Option<f64>,
    pub location: Option<String>,
}

/// One ranked recommendation. Derived per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramMatch {
    pub program_id: Uuid,
    pub program_name: String,
    pub provider_name: String,
    pub provider_logo_url: Option<String>,
    pub cip_code: String,
    pub match_score: i32,
    pub coverage_pct: i32,
    pub skills_covered: Vec<CoveredSkill>,
    pub skills_not_covered: Vec<Uuid>,
    pub program_details: ProgramDetails,
}

/// A published program with the set of gap skills it declares coverage for.
#[derive(Debug, Clone)]
pub struct ProgramCandidate {
    pub program: ProgramRow,
    pub skill_ids: Vec<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Coverage-based scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores candidates by weighted coverage of the gap list.
///
/// Per-gap weight = tier weight (critical 3 / important 2 / helpful 1)
/// × (1 + gap/100), so bigger deficits in more important skills pull the
/// score harder. match_score = covered weight / total weight × 100.
pub fn score_by_coverage(
    gaps: &[SkillGap],
    candidates: &[ProgramCandidate],
    options: &MatchOptions,
) -> Vec<ProgramMatch> {
    if gaps.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<ProgramMatch> = candidates
        .iter()
        .filter(|c| passes_filters(&c.program, options))
        .filter_map(|candidate| {
            let mut total_weight = 0.0;
            let mut covered_weight = 0.0;
            let mut covered = Vec::new();
            let mut not_covered = Vec::new();

            for gap in gaps {
                let weight = gap.importance.match_weight() * (1.0 + gap.gap / 100.0);
                total_weight += weight;

                if candidate.skill_ids.contains(&gap.skill_id) {
                    covered_weight += weight;
                    covered.push(CoveredSkill {
                        skill_id: gap.skill_id,
                        skill_name: gap.skill_name.clone(),
                        gap: gap.gap,
                    });
                } else {
                    not_covered.push(gap.skill_id);
                }
            }

            let match_score = (covered_weight / total_weight) * 100.0;
            if match_score < options.min_match_threshold {
                return None;
            }

            let coverage_pct = (covered.len() as f64 / gaps.len() as f64) * 100.0;
            Some(build_match(
                &candidate.program,
                match_score,
                coverage_pct,
                covered,
                not_covered,
            ))
        })
        .collect();

    sort_and_truncate(&mut matches, options.max_results);
    matches
}

// ────────────────────────────────────────────────────────────────────────────
// Crosswalk fallback scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores programs via the occupation-to-CIP crosswalk when no explicit skill
/// coverage exists: 90 for a primary match, 75 secondary, 60 tertiary, with
/// nominal full coverage of the gap list.
pub fn score_by_crosswalk(
    gaps: &[SkillGap],
    programs: &[ProgramRow],
    crosswalk: &[CrosswalkRow],
    options: &MatchOptions,
) -> Vec<ProgramMatch> {
    // Strongest entry wins when a CIP code appears more than once.
    let mut strength_by_cip: HashMap<&str, MatchStrength> = HashMap::new();
    for row in crosswalk {
        let strength = MatchStrength::parse(&row.match_strength);
        strength_by_cip
            .entry(row.cip_code.as_str())
            .and_modify(|existing| {
                if strength.base_score() > existing.base_score() {
                    *existing = strength;
                }
            })
            .or_insert(strength);
    }

    let nominal_coverage: Vec<CoveredSkill> = gaps
        .iter()
        .map(|g| CoveredSkill {
            skill_id: g.skill_id,
            skill_name: g.skill_name.clone(),
            gap: g.gap,
        })
        .collect();

    let mut matches: Vec<ProgramMatch> = programs
        .iter()
        .filter(|p| passes_filters(p, options))
        .filter_map(|program| {
            let strength = strength_by_cip.get(program.cip_code.as_str())?;
            let match_score = strength.base_score();
            if match_score < options.min_match_threshold {
                return None;
            }
            Some(build_match(
                program,
                match_score,
                100.0,
                nominal_coverage.clone(),
                Vec::new(),
            ))
        })
        .collect();

    sort_and_truncate(&mut matches, options.max_results);
    matches
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

fn passes_filters(program: &ProgramRow, options: &MatchOptions) -> bool {
    if let Some(modality) = &options.preferred_modality {
        if &program.modality != modality {
            return false;
        }
    }
    if let (Some(max_cost), Some(cost)) = (options.max_cost, program.cost_usd) {
        if cost > max_cost {
            return false;
        }
    }
    true
}

fn build_match(
    program: &ProgramRow,
    match_score: f64,
    coverage_pct: f64,
    skills_covered: Vec<CoveredSkill>,
    skills_not_covered: Vec<Uuid>,
) -> ProgramMatch {
    ProgramMatch {
        program_id: program.id,
        program_name: program.name.clone(),
        provider_name: program.provider_name.clone(),
        provider_logo_url: program.provider_logo_url.clone(),
        cip_code: program.cip_code.clone(),
        match_score: match_score.round() as i32,
        coverage_pct: coverage_pct.round() as i32,
        skills_covered,
        skills_not_covered,
        program_details: ProgramDetails {
            modality: program.modality.clone(),
            duration_weeks: program.duration_weeks,
            cost_usd: program.cost_usd,
            location: program.location.clone(),
        },
    }
}

/// Score descending, then coverage descending, then program name for a stable
/// deterministic order; truncated to the caller's result cap.
fn sort_and_truncate(matches: &mut Vec<ProgramMatch>, max_results: usize) {
    matches.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| b.coverage_pct.cmp(&a.coverage_pct))
            .then_with(|| a.program_name.cmp(&b.program_name))
    });
    matches.truncate(max_results);
}
