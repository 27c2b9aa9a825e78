use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ScoreRecord, Student};

/// Request payload for adding a student to a group
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateStudentRequest {
    pub group_id: Uuid,

    #[validate(custom(function = "super::validate_name"))]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[schema(value_type = Option<f64>)]
    pub height: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub weight: Option<Decimal>,

    #[validate(range(min = 20, max = 250, message = "Heart rate must be between 20 and 250"))]
    pub heart_rate: Option<i32>,

    #[schema(value_type = Option<f64>)]
    pub vital_capacity: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub sit_and_reach: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub run_50m: Option<Decimal>,

    #[validate(range(min = 0))]
    pub rope_skipping: Option<i32>,

    #[schema(value_type = Option<f64>)]
    pub single_leg_stand: Option<Decimal>,
}

/// Partial update of a student.
///
/// Absent fields are left unchanged; metrics sent as `null` are cleared.
/// The total score is not updatable here, it only moves through the ledger.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStudentRequest {
    #[validate(custom(function = "super::validate_name"))]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub group_id: Option<Uuid>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub height: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub heart_rate: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub vital_capacity: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub sit_and_reach: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub run_50m: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub rope_skipping: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub single_leg_stand: Option<Option<Decimal>>,
}

/// Distinguishes a field sent as `null` (`Some(None)`) from an absent one (`None`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListParams {
    pub group_id: Uuid,
}

/// Student together with their ledger, newest record first
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentWithRecords {
    #[serde(flatten)]
    pub student: Student,
    pub score_records: Vec<ScoreRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let req: UpdateStudentRequest =
            serde_json::from_value(serde_json::json!({ "height": null, "weight": 31.5 })).unwrap();

        assert_eq!(req.height, Some(None));
        assert_eq!(req.weight, Some(Some(Decimal::new(315, 1))));
        assert_eq!(req.heart_rate, None);
        assert_eq!(req.name, None);
    }

    #[test]
    fn test_update_rejects_total_score() {
        let result = serde_json::from_value::<UpdateStudentRequest>(
            serde_json::json!({ "total_score": 500 }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_validates_name_and_heart_rate() {
        let mut req = CreateStudentRequest {
            group_id: Uuid::new_v4(),
            name: "Leo".into(),
            height: Some(Decimal::new(120, 0)),
            weight: None,
            heart_rate: Some(80),
            vital_capacity: None,
            sit_and_reach: None,
            run_50m: None,
            rope_skipping: None,
            single_leg_stand: None,
        };
        assert!(req.validate().is_ok());

        req.heart_rate = Some(400);
        assert!(req.validate().is_err());

        req.heart_rate = None;
        req.name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_whitespace_only_names_are_rejected() {
        let req = CreateStudentRequest {
            group_id: Uuid::new_v4(),
            name: "   ".into(),
            height: None,
            weight: None,
            heart_rate: None,
            vital_capacity: None,
            sit_and_reach: None,
            run_50m: None,
            rope_skipping: None,
            single_leg_stand: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let update = UpdateStudentRequest {
            name: Some("\t ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let rename = UpdateStudentRequest {
            name: Some(" Leo ".into()),
            ..Default::default()
        };
        assert!(rename.validate().is_ok());
    }
}
