#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Published education program joined with its provider — denormalized to the
/// shape a recommendation card needs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramRow {
    pub id: Uuid,
    pub name: String,
    pub cip_code: String,
    pub modality: String,
    pub duration_weeks: Option<i32>,
    pub cost_usd: Option<f64>,
    pub location: Option<String>,
    pub provider_name: String,
    pub provider_logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramSkillRow {
    pub program_id: Uuid,
    pub skill_id: Uuid,
    pub weight: f64,
}

/// One CIP-SOC crosswalk entry. Static reference data maintained
/// administratively; read-only to the matcher.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CrosswalkRow {
    pub cip_code: String,
    pub soc_code: String,
    pub match_strength: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub program_id: Uuid,
    pub match_score: i32,
    pub skills_covered: Value,
    pub user_clicked: bool,
    pub user_enrolled: bool,
    pub created_at: DateTime<Utc>,
}

/// Confidence tier of a crosswalk entry. Drives the fallback match score when
/// no program declares explicit skill coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrength {
    Primary,
    Secondary,
    Tertiary,
}

impl MatchStrength {
    pub fn base_score(&self) -> f64 {
        match self {
            MatchStrength::Primary => 90.0,
            MatchStrength::Secondary => 75.0,
            MatchStrength::Tertiary => 60.0,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "primary" => MatchStrength::Primary,
            "secondary" => MatchStrength::Secondary,
            _ => MatchStrength::Tertiary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_strength_base_scores() {
        assert_eq!(MatchStrength::Primary.base_score(), 90.0);
        assert_eq!(MatchStrength::Secondary.base_score(), 75.0);
        assert_eq!(MatchStrength::Tertiary.base_score(), 60.0);
    }

    #[test]
    fn test_match_strength_parse_unknown_is_tertiary() {
        assert_eq!(MatchStrength::parse("weak"), MatchStrength::Tertiary);
    }
}
