//! Prompt assembly for the assessment-generation oracle.
//!
//! The enhanced context layers authoritative taxonomy data, regional market
//! intelligence, and company specifics so generated questions reveal precise
//! competency gaps instead of testing trivia.

use crate::intelligence::{
    calculate_dynamic_difficulty, CompanyContext, CompanySize, DifficultyLevel,
    MarketIntelligence,
};

/// System prompt for the skill-ranking call — enforces JSON-only output.
pub const SKILL_RANKING_SYSTEM: &str =
    "You are an expert career counselor and skills analyst. \
    Match skills to jobs based on occupational standards and current industry requirements. \
    Return valid JSON only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Skill-ranking prompt template.
/// Replace: {job_title}, {soc_code}, {job_description}, {candidate_count},
///          {skill_list}
pub const SKILL_RANKING_PROMPT_TEMPLATE: &str = r#"Job Title: {job_title}
SOC Code: {soc_code}
Description: {job_description}

From these {candidate_count} skills, select the 15 most relevant for this job.
Rate each skill's relevance (0-100) and categorize importance.

Skills:
{skill_list}

Return ONLY a valid JSON array (no markdown):
[{
  "skill_index": 0,
  "skill_name": "Python",
  "relevance_score": 95,
  "reasoning": "Core programming language for software development",
  "importance_level": "critical"
}]

Rules:
- Select exactly 15 skills (or fewer if less available)
- importance_level must be: "critical", "important", or "helpful"
- Prefer BROAD, UNIVERSAL skills (Python, JavaScript, SQL) over vendor-specific products
- Avoid company-specific products unless absolutely core to the occupation
- For standard occupations, choose skills applicable across most companies"#;

/// Inputs for the enhanced assessment-context prompt.
pub struct AssessmentContext<'a> {
    pub soc_code: &'a str,
    pub skill_name: &'a str,
    pub onet_importance: f64,
    pub market: &'a MarketIntelligence,
    pub company: &'a CompanyContext,
}

/// Builds the layered assessment-generation prompt: taxonomy foundation,
/// market intelligence, company context, and a calibrated difficulty target.
pub fn build_assessment_context(ctx: &AssessmentContext<'_>) -> String {
    let difficulty_score = calculate_dynamic_difficulty(
        ctx.onet_importance,
        ctx.market.current_demand,
        ctx.company.role_level,
        CompanySize::Medium,
    );
    let difficulty_level = DifficultyLevel::from_score(difficulty_score);

    format!(
        r#"LAYERED ASSESSMENT GENERATION

AUTHORITATIVE FOUNDATION (O*NET {soc_code}):
- Skill: {skill_name} (Importance: {importance:.1}/5.0)

REAL-TIME MARKET INTELLIGENCE:
- Current Demand: {demand} (trending {trend})
- Salary Range: {salary} ({region})
- Industry Focus: {industries}
- Emerging Requirements: {emerging}

COMPANY-SPECIFIC CONTEXT:
- Role Level: {role_level} ({team_size} team)
- Industry: {industry} ({regulatory})
- Success Metrics: {metrics}
- Organization Values: {values}

DIFFICULTY CALIBRATION:
- Calculated Difficulty: {difficulty_score}/100 ({difficulty_level} level)
- Question Complexity: create scenarios that match {role_level} responsibilities
- Performance Focus: test ability to {primary_metric}

REQUIREMENTS:
1. Questions must reveal precise competency gaps so results map to specific program recommendations.
2. Test actual job performance capability, not theoretical knowledge.
3. Focus on skills that differentiate qualified from unqualified candidates.

Question Format: multiple choice, scenario-based, outcome-focused
Context: {industry} industry, {role_level} level
Generate {difficulty_level} level questions."#,
        soc_code = ctx.soc_code,
        skill_name = ctx.skill_name,
        importance = ctx.onet_importance,
        demand = ctx.market.current_demand.as_str(),
        trend = ctx.market.trend_direction,
        salary = ctx.market.salary_range,
        region = ctx.market.region,
        industries = ctx.market.primary_industries.join(", "),
        emerging = ctx.market.emerging_requirements.join(", "),
        role_level = ctx.company.role_level.as_str(),
        team_size = ctx.company.team_size,
        industry = ctx.company.industry,
        regulatory = ctx.company.regulatory_environment,
        metrics = ctx.company.performance_metrics.join(", "),
        values = ctx.company.organization_values.join(", "),
        difficulty_score = difficulty_score,
        difficulty_level = difficulty_level.as_str(),
        primary_metric = ctx
            .company
            .performance_metrics
            .first()
            .map(String::as_str)
            .unwrap_or("deliver results"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::market_intelligence;

    #[test]
    fn test_assessment_context_includes_all_layers() {
        let market = market_intelligence("15-1252", "Tampa-St. Petersburg");
        let company = CompanyContext::default();
        let prompt = build_assessment_context(&AssessmentContext {
            soc_code: "15-1252",
            skill_name: "Relational Database Concepts",
            onet_importance: 4.2,
            market: &market,
            company: &company,
        });

        assert!(prompt.contains("O*NET 15-1252"));
        assert!(prompt.contains("Relational Database Concepts"));
        assert!(prompt.contains("Current Demand: high"));
        assert!(prompt.contains("Technology Services"));
        assert!(prompt.contains("/100"));
    }

    #[test]
    fn test_assessment_context_names_difficulty_level() {
        let market = market_intelligence("11-1021", "Tampa-St. Petersburg");
        let company = CompanyContext::default();
        let prompt = build_assessment_context(&AssessmentContext {
            soc_code: "11-1021",
            skill_name: "Administration and Management",
            onet_importance: 4.8,
            market: &market,
            company: &company,
        });

        // 4.8*20 * 1.4 * 1.0 * 0.95 = 127.7 → capped at 100 → expert.
        assert!(prompt.contains("100/100"));
        assert!(prompt.contains("expert level"));
    }

    #[test]
    fn test_ranking_prompt_placeholders_present() {
        for placeholder in [
            "{job_title}",
            "{soc_code}",
            "{job_description}",
            "{candidate_count}",
            "{skill_list}",
        ] {
            assert!(
                SKILL_RANKING_PROMPT_TEMPLATE.contains(placeholder),
                "missing {placeholder}"
            );
        }
    }
}
