//! Deterministic class statistics behind the template report.

use serde::Serialize;

use crate::{ReportError, Result, ReportSnapshot};

/// Lowest score counted as excellent.
pub const EXCELLENT_MIN: i64 = 180;
/// Lowest score counted as good.
pub const GOOD_MIN: i64 = 120;
/// Lowest score counted as average; anything below needs improvement.
pub const AVERAGE_MIN: i64 = 80;
/// Students under this score are listed for extra attention.
pub const FOCUS_BELOW: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl Tier {
    pub fn for_score(score: i64) -> Self {
        if score >= EXCELLENT_MIN {
            Self::Excellent
        } else if score >= GOOD_MIN {
            Self::Good
        } else if score >= AVERAGE_MIN {
            Self::Average
        } else {
            Self::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub needs_improvement: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusStudent {
    pub name: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStatistics {
    pub student_count: usize,
    pub average: i64,
    pub max: i64,
    pub min: i64,
    pub tiers: TierCounts,
    pub average_height: i64,
    pub average_weight: i64,
    pub average_heart_rate: i64,
    pub focus: Vec<FocusStudent>,
}

impl ClassStatistics {
    /// Compute statistics for a non-empty snapshot.
    pub fn compute(snapshot: &ReportSnapshot) -> Result<Self> {
        let students = &snapshot.students;
        if students.is_empty() {
            return Err(ReportError::InvalidInput(
                "cannot build a report for a class without students".to_string(),
            ));
        }

        let count = students.len();
        let total: i128 = students.iter().map(|s| i128::from(s.score)).sum();
        let max = students.iter().map(|s| s.score).max().unwrap_or_default();
        let min = students.iter().map(|s| s.score).min().unwrap_or_default();

        let mut tiers = TierCounts::default();
        for student in students {
            match Tier::for_score(student.score) {
                Tier::Excellent => tiers.excellent += 1,
                Tier::Good => tiers.good += 1,
                Tier::Average => tiers.average += 1,
                Tier::NeedsImprovement => tiers.needs_improvement += 1,
            }
        }

        let focus = students
            .iter()
            .filter(|s| s.score < FOCUS_BELOW)
            .map(|s| FocusStudent {
                name: s.name.clone(),
                score: s.score,
            })
            .collect();

        Ok(Self {
            student_count: count,
            average: round_half_up(total as f64 / count as f64),
            max,
            min,
            tiers,
            average_height: mean(students.iter().filter_map(|s| s.height)),
            average_weight: mean(students.iter().filter_map(|s| s.weight)),
            average_heart_rate: mean(students.iter().filter_map(|s| s.heart_rate.map(|h| h as f64))),
            focus,
        })
    }

    pub fn range(&self) -> i64 {
        self.max.saturating_sub(self.min)
    }

    /// Share of the class, in whole percent.
    pub fn percent(&self, n: usize) -> i64 {
        round_half_up(n as f64 / self.student_count as f64 * 100.0)
    }
}

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Rounded mean of the reported values, zero when nobody reported one.
/// Zero readings count as missing.
fn mean(values: impl Iterator<Item = f64>) -> i64 {
    let (sum, n) = values
        .filter(|v| *v != 0.0)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0 } else { round_half_up(sum / n as f64) }
}
