use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::ScoreRecord;

/// Request payload for awarding or deducting points
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ApplyScoreRequest {
    pub student_id: Uuid,

    /// Positive to award, negative to deduct. Zero is rejected.
    #[validate(custom(function = "validate_points_delta"))]
    pub points_delta: i32,

    #[validate(custom(function = "validate_reason"))]
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: String,
}

/// The committed ledger entry together with the student's post-write total
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplyScoreResponse {
    pub record: ScoreRecord,
    pub updated_total: i32,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ScoreHistoryParams {
    /// Most recent records to return (1-500). All records when omitted.
    pub limit: Option<i64>,
}

impl ScoreHistoryParams {
    pub fn validate(&self) -> Result<(), String> {
        match self.limit {
            Some(limit) if !(1..=500).contains(&limit) => {
                Err("limit must be between 1 and 500".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Comparison between a student's cached total and the sum of their ledger
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LedgerAudit {
    pub student_id: Uuid,
    pub name: String,
    pub total_score: i32,
    pub ledger_total: i64,
    pub record_count: i64,
}

impl LedgerAudit {
    pub fn is_consistent(&self) -> bool {
        i64::from(self.total_score) == self.ledger_total
    }

    pub fn difference(&self) -> i64 {
        i64::from(self.total_score) - self.ledger_total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LedgerAuditResponse {
    pub student_id: Uuid,
    pub name: String,
    pub total_score: i32,
    pub ledger_total: i64,
    pub record_count: i64,
    pub is_consistent: bool,
    pub difference: i64,
}

impl From<LedgerAudit> for LedgerAuditResponse {
    fn from(audit: LedgerAudit) -> Self {
        Self {
            is_consistent: audit.is_consistent(),
            difference: audit.difference(),
            student_id: audit.student_id,
            name: audit.name,
            total_score: audit.total_score,
            ledger_total: audit.ledger_total,
            record_count: audit.record_count,
        }
    }
}

pub(crate) fn validate_points_delta(points: i32) -> Result<(), validator::ValidationError> {
    if points == 0 {
        let mut err = validator::ValidationError::new("zero_points");
        err.message = Some("Points delta must be non-zero".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_reason(reason: &str) -> Result<(), validator::ValidationError> {
    if reason.trim().is_empty() {
        let mut err = validator::ValidationError::new("empty_reason");
        err.message = Some("Reason must not be empty".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(points_delta: i32, reason: &str) -> ApplyScoreRequest {
        ApplyScoreRequest {
            student_id: Uuid::new_v4(),
            points_delta,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_accepts_positive_and_negative_deltas() {
        assert!(request(3, "good behavior").validate().is_ok());
        assert!(request(-150, "penalty").validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_delta() {
        let errors = request(0, "nothing").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("points_delta"));
    }

    #[test]
    fn test_points_delta_rule_in_isolation() {
        assert!(validate_points_delta(1).is_ok());
        assert!(validate_points_delta(i32::MIN).is_ok());
        assert_eq!(validate_points_delta(0).unwrap_err().code, "zero_points");
    }

    #[test]
    fn test_rejects_blank_reason() {
        let errors = request(5, "   ").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("reason"));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let body = serde_json::json!({
            "student_id": Uuid::new_v4(),
            "points_delta": 2,
            "reason": "helped a classmate",
            "total_score": 999
        });
        assert!(serde_json::from_value::<ApplyScoreRequest>(body).is_err());
    }

    #[test]
    fn test_history_limit_bounds() {
        assert!(ScoreHistoryParams { limit: None }.validate().is_ok());
        assert!(ScoreHistoryParams { limit: Some(10) }.validate().is_ok());
        assert!(ScoreHistoryParams { limit: Some(0) }.validate().is_err());
        assert!(ScoreHistoryParams { limit: Some(501) }.validate().is_err());
    }

    #[test]
    fn test_audit_difference() {
        let audit = LedgerAudit {
            student_id: Uuid::new_v4(),
            name: "Mia".into(),
            total_score: 103,
            ledger_total: 100,
            record_count: 2,
        };
        assert!(!audit.is_consistent());
        assert_eq!(audit.difference(), 3);
    }
}
