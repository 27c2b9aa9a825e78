use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::student::{CreateStudentRequest, StudentWithRecords, UpdateStudentRequest};
use crate::error::{Result, StorageError};
use crate::models::{ScoreRecord, Student};

const STUDENT_COLUMNS: &str = "student_id, group_id, name, total_score, height, weight, heart_rate, \
     vital_capacity, sit_and_reach, run_50m, rope_skipping, single_leg_stand, created_at, updated_at";

pub struct StudentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StudentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Student> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Add a student to a group. New students always start at zero points.
    pub async fn create(&self, req: &CreateStudentRequest) -> Result<Student> {
        let mut tx = self.pool.begin().await?;
        let student = Self::create_in(&mut tx, req).await?;
        tx.commit().await?;

        tracing::info!(student_id = %student.student_id, group_id = %student.group_id, "Created student");

        Ok(student)
    }

    /// Insert a student inside a caller-owned transaction, so follow-up
    /// writes such as an opening balance commit or roll back with it.
    pub async fn create_in(
        tx: &mut Transaction<'_, Postgres>,
        req: &CreateStudentRequest,
    ) -> Result<Student> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidInput(
                "name must not be blank".to_string(),
            ));
        }

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (group_id, name, height, weight, heart_rate, vital_capacity,
                                  sit_and_reach, run_50m, rope_skipping, single_leg_stand)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(req.group_id)
        .bind(name)
        .bind(req.height)
        .bind(req.weight)
        .bind(req.heart_rate)
        .bind(req.vital_capacity)
        .bind(req.sit_and_reach)
        .bind(req.run_50m)
        .bind(req.rope_skipping)
        .bind(req.single_leg_stand)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            StorageError::from(e)
                .on_foreign_key_violation()
                .on_unique_violation(format!("A student named '{}' already exists in this group", name))
        })?;

        Ok(student)
    }

    /// Students of a group ranked by total score, each with their ledger newest first
    pub async fn list_for_group(&self, group_id: Uuid) -> Result<Vec<StudentWithRecords>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE group_id = $1
            ORDER BY total_score DESC, name, student_id
            "#
        ))
        .bind(group_id)
        .fetch_all(&mut *tx)
        .await?;

        let records = sqlx::query_as::<_, ScoreRecord>(
            r#"
            SELECT r.record_id, r.student_id, r.points_delta, r.reason, r.created_at
            FROM score_records r
            JOIN students s ON s.student_id = r.student_id
            WHERE s.group_id = $1
            ORDER BY r.created_at DESC, r.record_id
            "#,
        )
        .bind(group_id)
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

        Ok(students
            .into_iter()
            .map(|student| StudentWithRecords {
                score_records: records_by_student
                    .remove(&student.student_id)
                    .unwrap_or_default(),
                student,
            })
            .collect())
    }

    /// Apply a partial update. `total_score` is never touched here.
    pub async fn update(&self, id: Uuid, req: &UpdateStudentRequest) -> Result<Student> {
        let existing = self.find_by_id(id).await?;

        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.name)
            .to_string();
        let group_id = req.group_id.unwrap_or(existing.group_id);
        let height = req.height.unwrap_or(existing.height);
        let weight = req.weight.unwrap_or(existing.weight);
        let heart_rate = req.heart_rate.unwrap_or(existing.heart_rate);
        let vital_capacity = req.vital_capacity.unwrap_or(existing.vital_capacity);
        let sit_and_reach = req.sit_and_reach.unwrap_or(existing.sit_and_reach);
        let run_50m = req.run_50m.unwrap_or(existing.run_50m);
        let rope_skipping = req.rope_skipping.unwrap_or(existing.rope_skipping);
        let single_leg_stand = req.single_leg_stand.unwrap_or(existing.single_leg_stand);

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET name = $2,
                group_id = $3,
                height = $4,
                weight = $5,
                heart_rate = $6,
                vital_capacity = $7,
                sit_and_reach = $8,
                run_50m = $9,
                rope_skipping = $10,
                single_leg_stand = $11,
                updated_at = NOW()
            WHERE student_id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&name)
        .bind(group_id)
        .bind(height)
        .bind(weight)
        .bind(heart_rate)
        .bind(vital_capacity)
        .bind(sit_and_reach)
        .bind(run_50m)
        .bind(rope_skipping)
        .bind(single_leg_stand)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e)
                .on_foreign_key_violation()
                .on_unique_violation(format!("A student named '{}' already exists in this group", name))
        })?
        .ok_or(StorageError::NotFound)?;

        Ok(student)
    }

    /// Delete a student; their score records cascade
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::info!(student_id = %id, "Deleted student");

        Ok(())
    }
}
