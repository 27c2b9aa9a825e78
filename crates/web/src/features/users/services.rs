use sqlx::PgPool;
use storage::{error::Result, models::User, repository::user::UserRepository};

/// All accounts, newest first
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    UserRepository::new(pool).list().await
}
