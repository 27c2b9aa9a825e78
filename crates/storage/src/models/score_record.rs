use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Immutable ledger entry for one point change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScoreRecord {
    pub record_id: Uuid,
    pub student_id: Uuid,
    pub points_delta: i32,
    pub reason: String,
    pub created_at: chrono::NaiveDateTime,
}
