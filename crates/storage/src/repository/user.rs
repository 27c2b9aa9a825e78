use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::user::{CreateTeacherRequest, TeacherGroupSummary, TeacherWithGroups};
use crate::error::{Result, StorageError};
use crate::models::{Role, User};

#[derive(FromRow)]
struct TeacherGroupRow {
    teacher_id: Uuid,
    group_id: Uuid,
    name: String,
    description: Option<String>,
    student_count: i64,
    created_at: chrono::NaiveDateTime,
}

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every account, newest first
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, role, created_at
            FROM users
            ORDER BY created_at DESC, user_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, role, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert an account with the given role
    pub async fn create(&self, email: &str, name: &str, role: Role) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, email, name, role, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e).on_unique_violation(format!("Email '{}' is already registered", email))
        })
    }

    pub async fn create_teacher(&self, req: &CreateTeacherRequest) -> Result<User> {
        self.create(req.email.trim(), req.name.trim(), Role::Teacher)
            .await
    }

    /// Teachers with per-group student counts, newest teacher first
    pub async fn list_teachers_with_groups(&self) -> Result<Vec<TeacherWithGroups>> {
        let teachers = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, role, created_at
            FROM users
            WHERE role = 'TEACHER'
            ORDER BY created_at DESC, user_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, TeacherGroupRow>(
            r#"
            SELECT g.teacher_id, g.group_id, g.name, g.description, g.created_at,
                   COUNT(s.student_id) AS student_count
            FROM groups g
            JOIN users u ON u.user_id = g.teacher_id
            LEFT JOIN students s ON s.group_id = g.group_id
            WHERE u.role = 'TEACHER'
            GROUP BY g.group_id
            ORDER BY g.created_at DESC, g.group_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let mut groups_by_teacher: HashMap<Uuid, Vec<TeacherGroupSummary>> = HashMap::new();
        for row in rows {
            groups_by_teacher
                .entry(row.teacher_id)
                .or_default()
                .push(TeacherGroupSummary {
                    group_id: row.group_id,
                    name: row.name,
                    description: row.description,
                    student_count: row.student_count,
                    created_at: row.created_at,
                });
        }

        Ok(teachers
            .into_iter()
            .map(|t| TeacherWithGroups {
                groups: groups_by_teacher.remove(&t.user_id).unwrap_or_default(),
                user_id: t.user_id,
                email: t.email,
                name: t.name,
                role: t.role,
                created_at: t.created_at,
            })
            .collect())
    }

    /// Delete a teacher account; their groups, students and ledgers cascade
    pub async fn delete_teacher(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1 AND role = 'TEACHER'")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::info!(teacher_id = %id, "Deleted teacher account");

        Ok(())
    }

    /// Remove every account. Used by the admin reset tool only.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users").execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}
