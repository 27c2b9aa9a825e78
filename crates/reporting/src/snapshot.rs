use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Scores are stored as 32-bit integers.
pub const SCORE_MIN: i64 = i32::MIN as i64;
pub const SCORE_MAX: i64 = i32::MAX as i64;

/// Denormalised view of one class, the sole input to report generation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_student_count"))]
pub struct ReportSnapshot {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Class name must be between 1 and 255 characters"
    ))]
    pub class_name: String,

    pub student_count: usize,

    #[validate(nested)]
    pub students: Vec<SnapshotStudent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SnapshotStudent {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(alias = "total_score")]
    #[validate(range(min = SCORE_MIN, max = SCORE_MAX))]
    pub score: i64,

    /// Centimetres
    pub height: Option<f64>,

    /// Kilograms
    pub weight: Option<f64>,

    /// Beats per minute
    pub heart_rate: Option<i64>,
}

fn validate_student_count(snapshot: &ReportSnapshot) -> Result<(), ValidationError> {
    if snapshot.student_count != snapshot.students.len() {
        let mut err = ValidationError::new("student_count_mismatch");
        err.message = Some(
            format!(
                "student_count is {} but {} students were sent",
                snapshot.student_count,
                snapshot.students.len()
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

impl ReportSnapshot {
    /// Build a snapshot whose count is taken from the student list.
    pub fn new(class_name: impl Into<String>, students: Vec<SnapshotStudent>) -> Self {
        Self {
            class_name: class_name.into(),
            student_count: students.len(),
            students,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, score: i64) -> SnapshotStudent {
        SnapshotStudent {
            name: name.to_string(),
            score,
            height: None,
            weight: None,
            heart_rate: None,
        }
    }

    #[test]
    fn test_count_must_match_students() {
        let mut snapshot = ReportSnapshot::new("Class 1", vec![student("Leo", 10)]);
        assert!(snapshot.validate().is_ok());

        snapshot.student_count = 3;
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_class_name_required() {
        let snapshot = ReportSnapshot::new("", vec![student("Leo", 10)]);
        let errors = snapshot.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("class_name"));
    }

    #[test]
    fn test_score_must_fit_stored_range() {
        let edges = ReportSnapshot::new(
            "Class 1",
            vec![student("Leo", SCORE_MAX), student("Ivy", SCORE_MIN)],
        );
        assert!(edges.validate().is_ok());

        let too_big = ReportSnapshot::new("Class 1", vec![student("Leo", i64::MAX)]);
        assert!(too_big.validate().is_err());

        let too_small = ReportSnapshot::new("Class 1", vec![student("Leo", SCORE_MIN - 1)]);
        assert!(too_small.validate().is_err());
    }

    #[test]
    fn test_accepts_total_score_alias() {
        let parsed: SnapshotStudent =
            serde_json::from_value(serde_json::json!({ "name": "Ivy", "total_score": 200 })).unwrap();
        assert_eq!(parsed.score, 200);
        assert_eq!(parsed.height, None);
    }
}
