use sqlx::PgPool;
use storage::{
    dto::score::{ApplyScoreRequest, ApplyScoreResponse, LedgerAuditResponse},
    error::Result,
    models::ScoreRecord,
    repository::score::ScoreLedger,
};
use uuid::Uuid;

/// Award or deduct points, returning the committed total
pub async fn apply_score(pool: &PgPool, request: &ApplyScoreRequest) -> Result<ApplyScoreResponse> {
    let ledger = ScoreLedger::new(pool);
    let (record, updated_total) = ledger
        .apply_score(request.student_id, request.points_delta, &request.reason)
        .await?;

    Ok(ApplyScoreResponse {
        record,
        updated_total,
    })
}

/// A student's ledger, newest first
pub async fn list_history(
    pool: &PgPool,
    student_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<ScoreRecord>> {
    ScoreLedger::new(pool).history(student_id, limit).await
}

pub async fn audit_student(pool: &PgPool, student_id: Uuid) -> Result<LedgerAuditResponse> {
    let audit = ScoreLedger::new(pool).audit(student_id).await?;
    Ok(LedgerAuditResponse::from(audit))
}
