//! Recommendation interaction tracking — plain audit inserts recording when a
//! recommendation is shown, clicked, or converted to an enrollment.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Records that a recommendation was surfaced to the user.
pub async fn track_recommendation(
    pool: &PgPool,
    assessment_id: Uuid,
    program_id: Uuid,
    match_score: i32,
    skills_covered: &[Uuid],
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO program_recommendations
            (id, assessment_id, program_id, match_score, skills_covered, user_clicked, user_enrolled)
        VALUES ($1, $2, $3, $4, $5, FALSE, FALSE)
        "#,
    )
    .bind(id)
    .bind(assessment_id)
    .bind(program_id)
    .bind(match_score)
    .bind(serde_json::to_value(skills_covered).unwrap_or_default())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Marks a tracked recommendation as clicked through.
pub async fn record_click(pool: &PgPool, recommendation_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE program_recommendations SET user_clicked = TRUE WHERE id = $1")
        .bind(recommendation_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Recommendation {recommendation_id} not found"
        )));
    }
    Ok(())
}

/// Marks a tracked recommendation as converted to an enrollment.
pub async fn record_enrollment(pool: &PgPool, recommendation_id: Uuid) -> Result<(), AppError> {
    let result =
        sqlx::query("UPDATE program_recommendations SET user_enrolled = TRUE WHERE id = $1")
            .bind(recommendation_id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Recommendation {recommendation_id} not found"
        )));
    }
    Ok(())
}
