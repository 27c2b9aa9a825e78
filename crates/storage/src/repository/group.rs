use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::group::{CreateGroupRequest, GroupSummary, GroupWithStudents};
use crate::dto::roster::TeacherInfo;
use crate::dto::student::StudentWithRecords;
use crate::error::{Result, StorageError};
use crate::models::{Group, ScoreRecord, Student};

#[derive(FromRow)]
struct GroupSummaryRow {
    group_id: Uuid,
    name: String,
    description: Option<String>,
    student_count: i64,
    created_at: chrono::NaiveDateTime,
    teacher_id: Uuid,
    teacher_name: String,
    teacher_email: String,
}

/// Repository for Group database operations
pub struct GroupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GroupRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Group> {
        sqlx::query_as::<_, Group>(
            r#"
            SELECT group_id, name, description, teacher_id, created_at
            FROM groups
            WHERE group_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Create a group owned by an existing teacher
    pub async fn create(&self, req: &CreateGroupRequest) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, description, teacher_id)
            VALUES ($1, $2, $3)
            RETURNING group_id, name, description, teacher_id, created_at
            "#,
        )
        .bind(req.name.trim())
        .bind(req.description.as_deref())
        .bind(req.teacher_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_foreign_key_violation())?;

        tracing::info!(group_id = %group.group_id, teacher_id = %group.teacher_id, "Created group");

        Ok(group)
    }

    /// A teacher's groups, newest first, each with its students and their ledgers
    pub async fn list_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<GroupWithStudents>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT group_id, name, description, teacher_id, created_at
            FROM groups
            WHERE teacher_id = $1
            ORDER BY created_at DESC, group_id
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&mut *tx)
        .await?;

        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT s.*
            FROM students s
            JOIN groups g ON g.group_id = s.group_id
            WHERE g.teacher_id = $1
            ORDER BY s.total_score DESC, s.name, s.student_id
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&mut *tx)
        .await?;

        let records = sqlx::query_as::<_, ScoreRecord>(
            r#"
            SELECT r.record_id, r.student_id, r.points_delta, r.reason, r.created_at
            FROM score_records r
            JOIN students s ON s.student_id = r.student_id
            JOIN groups g ON g.group_id = s.group_id
            WHERE g.teacher_id = $1
            ORDER BY r.created_at DESC, r.record_id
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut records_by_student: HashMap<Uuid, Vec<ScoreRecord>> = HashMap::new();
        for record in records {
            records_by_student
                .entry(record.student_id)
                .or_default()
                .push(record);
        }

        let mut students_by_group: HashMap<Uuid, Vec<StudentWithRecords>> = HashMap::new();
        for student in students {
            let score_records = records_by_student
                .remove(&student.student_id)
                .unwrap_or_default();
            students_by_group
                .entry(student.group_id)
                .or_default()
                .push(StudentWithRecords {
                    student,
                    score_records,
                });
        }

        Ok(groups
            .into_iter()
            .map(|group| GroupWithStudents {
                students: students_by_group
                    .remove(&group.group_id)
                    .unwrap_or_default(),
                group,
            })
            .collect())
    }

    /// Every group with its teacher and student count, newest first
    pub async fn list_summaries(&self) -> Result<Vec<GroupSummary>> {
        let rows = sqlx::query_as::<_, GroupSummaryRow>(
            r#"
            SELECT g.group_id, g.name, g.description, g.created_at,
                   u.user_id AS teacher_id, u.name AS teacher_name, u.email AS teacher_email,
                   COUNT(s.student_id) AS student_count
            FROM groups g
            JOIN users u ON u.user_id = g.teacher_id
            LEFT JOIN students s ON s.group_id = g.group_id
            GROUP BY g.group_id, u.user_id
            ORDER BY g.created_at DESC, g.group_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| GroupSummary {
                group_id: row.group_id,
                name: row.name,
                description: row.description,
                student_count: row.student_count,
                created_at: row.created_at,
                teacher: TeacherInfo {
                    user_id: row.teacher_id,
                    name: row.teacher_name,
                    email: row.teacher_email,
                },
            })
            .collect())
    }

    /// Delete a group; its students and their score records cascade
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM groups WHERE group_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::info!(group_id = %id, "Deleted group");

        Ok(())
    }
}
