use sqlx::PgPool;
use storage::{
    dto::group::{CreateGroupRequest, GroupWithStudents},
    error::Result,
    models::Group,
    repository::group::GroupRepository,
};
use uuid::Uuid;

/// A teacher's groups with students and their score records
pub async fn list_groups_for_teacher(pool: &PgPool, teacher_id: Uuid) -> Result<Vec<GroupWithStudents>> {
    GroupRepository::new(pool).list_for_teacher(teacher_id).await
}

pub async fn create_group(pool: &PgPool, request: &CreateGroupRequest) -> Result<Group> {
    GroupRepository::new(pool).create(request).await
}
