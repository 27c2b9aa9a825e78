use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Role;

/// Request payload for creating a teacher account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTeacherRequest {
    #[validate(email(message = "Email must be a valid address"))]
    #[validate(length(max = 255))]
    pub email: String,

    #[validate(custom(function = "super::validate_name"))]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,
}

/// Teacher account with a summary of every group they own
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherWithGroups {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: chrono::NaiveDateTime,
    pub groups: Vec<TeacherGroupSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherGroupSummary {
    pub group_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub student_count: i64,
    pub created_at: chrono::NaiveDateTime,
}
