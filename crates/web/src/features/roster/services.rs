use sqlx::PgPool;
use storage::{dto::roster::RosterGroup, error::Result, repository::roster::RosterRepository};

/// Every group with its teacher and students, read from one snapshot
pub async fn list_roster(pool: &PgPool) -> Result<Vec<RosterGroup>> {
    RosterRepository::new(pool).list_groups_with_students().await
}
