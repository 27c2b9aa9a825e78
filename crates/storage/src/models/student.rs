use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A student row. `total_score` is a cache of the student's ledger and is
/// only ever written by the score ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub student_id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub total_score: i32,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub heart_rate: Option<i32>,
    pub vital_capacity: Option<Decimal>,
    pub sit_and_reach: Option<Decimal>,
    pub run_50m: Option<Decimal>,
    pub rope_skipping: Option<i32>,
    pub single_leg_stand: Option<Decimal>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}
