//! Assessment intelligence — combines taxonomy importance with market and
//! company context to produce difficulty calibration and skill weighting for
//! admin visibility, plus the enhanced assessment-context prompt.

pub mod handlers;
pub mod prompts;
pub mod ranking;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Context dimensions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketDemand {
    Low,
    Moderate,
    High,
    Critical,
}

impl MarketDemand {
    pub fn multiplier(&self) -> f64 {
        match self {
            MarketDemand::Low => 0.8,
            MarketDemand::Moderate => 1.0,
            MarketDemand::High => 1.2,
            MarketDemand::Critical => 1.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketDemand::Low => "low",
            MarketDemand::Moderate => "moderate",
            MarketDemand::High => "high",
            MarketDemand::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl RoleLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            RoleLevel::Entry => 0.7,
            RoleLevel::Mid => 1.0,
            RoleLevel::Senior => 1.3,
            RoleLevel::Executive => 1.6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleLevel::Entry => "entry",
            RoleLevel::Mid => "mid",
            RoleLevel::Senior => "senior",
            RoleLevel::Executive => "executive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Startup,
    Small,
    Medium,
    Large,
    Enterprise,
}

impl CompanySize {
    /// Small teams carry higher expectations per person; large organizations
    /// run more specialized roles.
    pub fn multiplier(&self) -> f64 {
        match self {
            CompanySize::Startup => 1.1,
            CompanySize::Small => 1.0,
            CompanySize::Medium => 0.95,
            CompanySize::Large => 0.9,
            CompanySize::Enterprise => 0.85,
        }
    }
}

/// Difficulty label assigned to a skill assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => DifficultyLevel::Expert,
            60..=79 => DifficultyLevel::Advanced,
            40..=59 => DifficultyLevel::Intermediate,
            _ => DifficultyLevel::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Basic => "basic",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
            DifficultyLevel::Expert => "expert",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Difficulty and weighting calculations
// ────────────────────────────────────────────────────────────────────────────

/// Computes a 0–100 difficulty score from the taxonomy importance baseline
/// scaled by market, role, and company-size multipliers.
pub fn calculate_dynamic_difficulty(
    onet_importance: f64,
    market: MarketDemand,
    role: RoleLevel,
    size: CompanySize,
) -> u32 {
    // Convert the 1-5 importance scale to a 0-100 baseline.
    let base_score = onet_importance * 20.0;
    let scaled = base_score * market.multiplier() * role.multiplier() * size.multiplier();
    (scaled.round() as u32).min(100)
}

/// Skill weighting surfaced to admins alongside each job-skill requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillWeighting {
    pub onet_importance: f64,
    pub market_adjustment: f64,
    pub company_weight: f64,
    pub final_weight: f64,
    pub difficulty_level: DifficultyLevel,
    pub question_count: u32,
    pub performance_correlation: f64,
}

/// Combines the taxonomy baseline with market demand and company-specific
/// importance into a final assessment weight, capped at the 5.0 scale.
pub fn calculate_skill_weighting(
    onet_importance: f64,
    market: MarketDemand,
    company_weight: f64,
    historical_performance: f64,
) -> SkillWeighting {
    let market_adjustment = market.multiplier();
    let final_weight = (onet_importance * market_adjustment * (company_weight / 3.0)).min(5.0);

    let difficulty_level = if final_weight >= 4.0 {
        DifficultyLevel::Expert
    } else if final_weight >= 3.0 {
        DifficultyLevel::Advanced
    } else if final_weight >= 2.0 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Basic
    };

    SkillWeighting {
        onet_importance,
        market_adjustment,
        company_weight,
        final_weight: (final_weight * 10.0).round() / 10.0,
        difficulty_level,
        // 2-10 questions depending on importance.
        question_count: (final_weight * 2.0).round() as u32,
        performance_correlation: historical_performance,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Market and company context (mock providers)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketIntelligence {
    pub current_demand: MarketDemand,
    pub salary_range: String,
    pub trend_direction: String,
    pub primary_industries: Vec<String>,
    pub emerging_requirements: Vec<String>,
    pub region: String,
}

/// Returns regional market intelligence for an occupation.
///
/// TODO: replace the SOC-prefix heuristics with a live labor-market feed once
/// the regional data contract is signed.
pub fn market_intelligence(soc_code: &str, region: &str) -> MarketIntelligence {
    let demand_by_prefix: &[(&str, MarketDemand)] = &[
        ("15-", MarketDemand::High),     // Computer occupations
        ("11-", MarketDemand::Critical), // Management
        ("13-", MarketDemand::Moderate), // Business/Financial
        ("29-", MarketDemand::High),     // Healthcare
        ("25-", MarketDemand::Moderate), // Education
    ];

    let current_demand = demand_by_prefix
        .iter()
        .find(|(prefix, _)| soc_code.starts_with(prefix))
        .map(|(_, demand)| *demand)
        .unwrap_or(MarketDemand::Moderate);

    MarketIntelligence {
        current_demand,
        salary_range: "$45,000 - $85,000".to_string(),
        trend_direction: "rising".to_string(),
        primary_industries: vec![
            "Technology".to_string(),
            "Healthcare".to_string(),
            "Finance".to_string(),
        ],
        emerging_requirements: vec![
            "Digital transformation".to_string(),
            "Remote collaboration".to_string(),
        ],
        region: region.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyContext {
    pub role_level: RoleLevel,
    pub team_size: String,
    pub industry: String,
    pub regulatory_environment: String,
    pub performance_metrics: Vec<String>,
    pub organization_values: Vec<String>,
}

impl Default for CompanyContext {
    fn default() -> Self {
        Self {
            role_level: RoleLevel::Mid,
            team_size: "5-15 people".to_string(),
            industry: "Technology Services".to_string(),
            regulatory_environment: "Standard compliance".to_string(),
            performance_metrics: vec![
                "Revenue growth".to_string(),
                "Team productivity".to_string(),
                "Customer satisfaction".to_string(),
            ],
            organization_values: vec![
                "Innovation".to_string(),
                "Collaboration".to_string(),
                "Results-driven".to_string(),
            ],
        }
    }
}
