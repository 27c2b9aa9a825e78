use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::roster::TeacherInfo;
use super::student::StudentWithRecords;
use crate::models::Group;

/// Request payload for creating a new group
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateGroupRequest {
    #[validate(custom(function = "super::validate_name"))]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub teacher_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupListParams {
    pub teacher_id: Uuid,
}

/// A teacher's group with its students and their ledgers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupWithStudents {
    #[serde(flatten)]
    pub group: Group,
    pub students: Vec<StudentWithRecords>,
}

/// Admin listing entry: group, owning teacher, and size
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupSummary {
    pub group_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub student_count: i64,
    pub created_at: chrono::NaiveDateTime,
    pub teacher: TeacherInfo,
}
