#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// One measured skill score within an assessment attempt.
/// Produced by the assessment-scoring pipeline; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentSkillResultRow {
    pub assessment_id: Uuid,
    pub skill_id: Uuid,
    pub score_pct: f64,
}
