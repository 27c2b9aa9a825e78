use sqlx::PgPool;
use storage::{
    dto::student::{CreateStudentRequest, StudentWithRecords, UpdateStudentRequest},
    error::Result,
    models::Student,
    repository::student::StudentRepository,
};
use uuid::Uuid;

/// Students of a group with their ledgers
pub async fn list_students(pool: &PgPool, group_id: Uuid) -> Result<Vec<StudentWithRecords>> {
    StudentRepository::new(pool).list_for_group(group_id).await
}

pub async fn create_student(pool: &PgPool, request: &CreateStudentRequest) -> Result<Student> {
    StudentRepository::new(pool).create(request).await
}

pub async fn update_student(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateStudentRequest,
) -> Result<Student> {
    StudentRepository::new(pool).update(id, request).await
}

pub async fn delete_student(pool: &PgPool, id: Uuid) -> Result<()> {
    StudentRepository::new(pool).delete(id).await
}
