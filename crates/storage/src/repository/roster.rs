use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::roster::{RosterGroup, RosterStudent, TeacherInfo};
use crate::error::{Result, StorageError};

#[derive(FromRow)]
struct GroupRow {
    group_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: chrono::NaiveDateTime,
    teacher_id: Uuid,
    teacher_name: String,
    teacher_email: String,
}

/// Read-only projection of groups with their teacher and ranked students.
///
/// Both queries run in one `REPEATABLE READ` snapshot on the primary pool:
/// every score committed before the call started is visible, and the
/// students listed always belong to the groups listed.
pub struct RosterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RosterRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All groups newest first, students ordered by total score descending
    pub async fn list_groups_with_students(&self) -> Result<Vec<RosterGroup>> {
        let mut tx = self.begin_snapshot().await?;

        let groups = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT g.group_id, g.name, g.description, g.created_at,
                   u.user_id AS teacher_id, u.name AS teacher_name, u.email AS teacher_email
            FROM groups g
            JOIN users u ON u.user_id = g.teacher_id
            ORDER BY g.created_at DESC, g.group_id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let students = sqlx::query_as::<_, RosterStudent>(
            r#"
            SELECT student_id, group_id, name, total_score, height, weight, heart_rate, created_at
            FROM students
            ORDER BY total_score DESC, name, student_id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(assemble(groups, students))
    }

    /// A single group of the roster
    pub async fn find_group(&self, group_id: Uuid) -> Result<RosterGroup> {
        let mut tx = self.begin_snapshot().await?;

        let group = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT g.group_id, g.name, g.description, g.created_at,
                   u.user_id AS teacher_id, u.name AS teacher_name, u.email AS teacher_email
            FROM groups g
            JOIN users u ON u.user_id = g.teacher_id
            WHERE g.group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let students = sqlx::query_as::<_, RosterStudent>(
            r#"
            SELECT student_id, group_id, name, total_score, height, weight, heart_rate, created_at
            FROM students
            WHERE group_id = $1
            ORDER BY total_score DESC, name, student_id
            "#,
        )
        .bind(group_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        assemble(vec![group], students)
            .pop()
            .ok_or(StorageError::NotFound)
    }

    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

/// Nest students under their groups, keeping both input orders.
fn assemble(groups: Vec<GroupRow>, students: Vec<RosterStudent>) -> Vec<RosterGroup> {
    let mut by_group: HashMap<Uuid, Vec<RosterStudent>> = HashMap::new();
    for student in students {
        by_group.entry(student.group_id).or_default().push(student);
    }

    groups
        .into_iter()
        .map(|g| RosterGroup {
            students: by_group.remove(&g.group_id).unwrap_or_default(),
            group_id: g.group_id,
            name: g.name,
            description: g.description,
            created_at: g.created_at,
            teacher: TeacherInfo {
                user_id: g.teacher_id,
                name: g.teacher_name,
                email: g.teacher_email,
            },
        })
        .collect()
}
