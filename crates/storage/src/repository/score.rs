use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::score::LedgerAudit;
use crate::error::{Result, StorageError};
use crate::models::ScoreRecord;

/// The only writer of score state.
///
/// Each applied score appends a [`ScoreRecord`] and bumps the student's
/// cached `total_score` in the same transaction, so
/// `total_score == SUM(points_delta)` holds for every committed state.
pub struct ScoreLedger<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreLedger<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a ledger entry and return it with the committed total.
    pub async fn apply_score(
        &self,
        student_id: Uuid,
        points_delta: i32,
        reason: &str,
    ) -> Result<(ScoreRecord, i32)> {
        let mut tx = self.pool.begin().await?;

        let applied = Self::apply_in(&mut tx, student_id, points_delta, reason).await?;

        tx.commit().await?;

        tracing::info!(
            student_id = %student_id,
            points_delta,
            updated_total = applied.1,
            "Applied score"
        );

        Ok(applied)
    }

    /// Perform the ledger writes inside a caller-owned transaction.
    ///
    /// Nothing becomes visible until the caller commits; dropping or rolling
    /// back `tx` discards both the record and the total change.
    pub async fn apply_in(
        tx: &mut Transaction<'_, Postgres>,
        student_id: Uuid,
        points_delta: i32,
        reason: &str,
    ) -> Result<(ScoreRecord, i32)> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StorageError::InvalidInput(
                "reason must not be empty".to_string(),
            ));
        }
        if points_delta == 0 {
            return Err(StorageError::InvalidInput(
                "points_delta must be non-zero".to_string(),
            ));
        }

        // The UPDATE takes the row lock, so concurrent writers to the same
        // student queue here instead of losing increments.
        let updated_total = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE students
            SET total_score = total_score + $2,
                updated_at = NOW()
            WHERE student_id = $1
            RETURNING total_score
            "#,
        )
        .bind(student_id)
        .bind(points_delta)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let record = sqlx::query_as::<_, ScoreRecord>(
            r#"
            INSERT INTO score_records (student_id, points_delta, reason)
            VALUES ($1, $2, $3)
            RETURNING record_id, student_id, points_delta, reason, created_at
            "#,
        )
        .bind(student_id)
        .bind(points_delta)
        .bind(reason)
        .fetch_one(&mut **tx)
        .await?;

        Ok((record, updated_total))
    }

    /// Ledger of one student, newest first
    pub async fn history(&self, student_id: Uuid, limit: Option<i64>) -> Result<Vec<ScoreRecord>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE student_id = $1)",
        )
        .bind(student_id)
        .fetch_one(self.pool)
        .await?;

        if !exists {
            return Err(StorageError::NotFound);
        }

        let records = sqlx::query_as::<_, ScoreRecord>(
            r#"
            SELECT record_id, student_id, points_delta, reason, created_at
            FROM score_records
            WHERE student_id = $1
            ORDER BY created_at DESC, record_id
            LIMIT $2
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    /// Compare one student's cached total with the sum of their ledger
    pub async fn audit(&self, student_id: Uuid) -> Result<LedgerAudit> {
        sqlx::query_as::<_, LedgerAudit>(
            r#"
            SELECT s.student_id, s.name, s.total_score,
                   COALESCE(SUM(r.points_delta), 0)::bigint AS ledger_total,
                   COUNT(r.record_id) AS record_count
            FROM students s
            LEFT JOIN score_records r ON r.student_id = s.student_id
            WHERE s.student_id = $1
            GROUP BY s.student_id
            "#,
        )
        .bind(student_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Audit every student, mismatches first
    pub async fn audit_all(&self) -> Result<Vec<LedgerAudit>> {
        let audits = sqlx::query_as::<_, LedgerAudit>(
            r#"
            SELECT s.student_id, s.name, s.total_score,
                   COALESCE(SUM(r.points_delta), 0)::bigint AS ledger_total,
                   COUNT(r.record_id) AS record_count
            FROM students s
            LEFT JOIN score_records r ON r.student_id = s.student_id
            GROUP BY s.student_id
            ORDER BY (s.total_score <> COALESCE(SUM(r.points_delta), 0)) DESC, s.name, s.student_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let inconsistent = audits.iter().filter(|a| !a.is_consistent()).count();
        if inconsistent > 0 {
            tracing::warn!(inconsistent, "Ledger audit found students whose total drifted from their records");
        }

        Ok(audits)
    }
}
