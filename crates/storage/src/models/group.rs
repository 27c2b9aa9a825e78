use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Group {
    pub group_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
}
