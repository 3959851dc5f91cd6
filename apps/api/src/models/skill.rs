#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    /// Origin taxonomy: "ONET" or "LIGHTCAST".
    pub source: String,
    pub onet_id: Option<String>,
    pub onet_importance: Option<f64>,
    pub is_assessable: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSkillRow {
    pub job_id: Uuid,
    pub skill_id: Uuid,
    pub importance_level: String,
    pub proficiency_threshold: i16,
    pub weight: f64,
    pub onet_data_source: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub soc_code: Option<String>,
    pub long_desc: Option<String>,
}

/// Job-skill requirement joined with its skill row — the shape the gap
/// calculator consumes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequiredSkillRow {
    pub job_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub skill_category: String,
    pub importance_level: String,
    pub proficiency_threshold: i16,
    pub weight: f64,
}

/// Importance tier for a job-skill requirement.
///
/// Critical tiers sort first in gap lists and carry the highest proficiency
/// threshold. Stored as lowercase text in `job_skills.importance_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceTier {
    Critical,
    Important,
    Helpful,
}

impl ImportanceTier {
    /// Maps a source-taxonomy importance score (1.0–5.0) to a tier.
    pub fn from_importance(importance: f64) -> Self {
        if importance >= 4.5 {
            ImportanceTier::Critical
        } else if importance >= 3.5 {
            ImportanceTier::Important
        } else {
            ImportanceTier::Helpful
        }
    }

    /// Minimum score percentage the tier demands.
    pub fn proficiency_threshold(&self) -> i16 {
        match self {
            ImportanceTier::Critical => 80,
            ImportanceTier::Important => 70,
            ImportanceTier::Helpful => 60,
        }
    }

    /// Sort rank — critical gaps always come first.
    pub fn rank(&self) -> u8 {
        match self {
            ImportanceTier::Critical => 0,
            ImportanceTier::Important => 1,
            ImportanceTier::Helpful => 2,
        }
    }

    /// Relative weight used by the program-match scorer.
    pub fn match_weight(&self) -> f64 {
        match self {
            ImportanceTier::Critical => 3.0,
            ImportanceTier::Important => 2.0,
            ImportanceTier::Helpful => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportanceTier::Critical => "critical",
            ImportanceTier::Important => "important",
            ImportanceTier::Helpful => "helpful",
        }
    }

    /// Parses the stored text value. Unknown values degrade to Helpful rather
    /// than failing the whole gap calculation.
    pub fn parse(s: &str) -> Self {
        match s {
            "critical" => ImportanceTier::Critical,
            "important" => ImportanceTier::Important,
            _ => ImportanceTier::Helpful,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_from_importance() {
        assert_eq!(ImportanceTier::from_importance(4.5), ImportanceTier::Critical);
        assert_eq!(ImportanceTier::from_importance(4.49), ImportanceTier::Important);
        assert_eq!(ImportanceTier::from_importance(3.5), ImportanceTier::Important);
        assert_eq!(ImportanceTier::from_importance(3.49), ImportanceTier::Helpful);
        assert_eq!(ImportanceTier::from_importance(1.0), ImportanceTier::Helpful);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(ImportanceTier::Critical.proficiency_threshold(), 80);
        assert_eq!(ImportanceTier::Important.proficiency_threshold(), 70);
        assert_eq!(ImportanceTier::Helpful.proficiency_threshold(), 60);
    }

    #[test]
    fn test_tier_parse_roundtrip() {
        for tier in [
            ImportanceTier::Critical,
            ImportanceTier::Important,
            ImportanceTier::Helpful,
        ] {
            assert_eq!(ImportanceTier::parse(tier.as_str()), tier);
        }
    }

    #[test]
    fn test_tier_parse_unknown_degrades_to_helpful() {
        assert_eq!(ImportanceTier::parse("essential"), ImportanceTier::Helpful);
        assert_eq!(ImportanceTier::parse(""), ImportanceTier::Helpful);
    }

    #[test]
    fn test_tier_rank_ordering() {
        assert!(ImportanceTier::Critical.rank() < ImportanceTier::Important.rank());
        assert!(ImportanceTier::Important.rank() < ImportanceTier::Helpful.rank());
    }
}
