use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Public summary of a group's owning teacher
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherInfo {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

/// One group of the roster, students ranked by total score
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterGroup {
    pub group_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub teacher: TeacherInfo,
    pub students: Vec<RosterStudent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RosterStudent {
    pub student_id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub total_score: i32,
    #[schema(value_type = Option<f64>)]
    pub height: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Decimal>,
    pub heart_rate: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
}
