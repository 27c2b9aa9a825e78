use sqlx::PgPool;
use storage::{
    dto::{
        group::GroupSummary,
        score::LedgerAuditResponse,
        user::{CreateTeacherRequest, TeacherWithGroups},
    },
    error::Result,
    models::User,
    repository::{group::GroupRepository, score::ScoreLedger, user::UserRepository},
};
use uuid::Uuid;

pub async fn list_teachers(pool: &PgPool) -> Result<Vec<TeacherWithGroups>> {
    UserRepository::new(pool).list_teachers_with_groups().await
}

pub async fn create_teacher(pool: &PgPool, request: &CreateTeacherRequest) -> Result<User> {
    UserRepository::new(pool).create_teacher(request).await
}

/// Delete a teacher; their groups, students and score records cascade
pub async fn delete_teacher(pool: &PgPool, id: Uuid) -> Result<()> {
    UserRepository::new(pool).delete_teacher(id).await
}

pub async fn list_groups(pool: &PgPool) -> Result<Vec<GroupSummary>> {
    GroupRepository::new(pool).list_summaries().await
}

pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<()> {
    GroupRepository::new(pool).delete(id).await
}

/// Compare every student's cached total with their ledger
pub async fn audit_ledger(pool: &PgPool) -> Result<Vec<LedgerAuditResponse>> {
    let audits = ScoreLedger::new(pool).audit_all().await?;
    Ok(audits.into_iter().map(LedgerAuditResponse::from).collect())
}
