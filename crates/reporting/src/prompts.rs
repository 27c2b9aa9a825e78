use std::fmt::Write;

use crate::ReportSnapshot;

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn system_prompt() -> &'static str {
        "You are an experienced teaching analyst who writes clear, data-driven class reports for teachers."
    }

    pub fn report_prompt(snapshot: &ReportSnapshot) -> String {
        let mut roster = String::new();
        for (index, student) in snapshot.students.iter().enumerate() {
            let _ = write!(roster, "{}. {} - score: {}", index + 1, student.name, student.score);
            if let Some(height) = student.height {
                let _ = write!(roster, ", height: {}cm", height);
            }
            if let Some(weight) = student.weight {
                let _ = write!(roster, ", weight: {}kg", weight);
            }
            if let Some(heart_rate) = student.heart_rate {
                let _ = write!(roster, ", heart rate: {}bpm", heart_rate);
            }
            roster.push('\n');
        }

        format!(
            r#"Write a detailed analysis report for the class "{class}".

Class data:
- Class name: {class}
- Number of students: {count}
- Students:
{roster}
Produce a Markdown report with these sections:

1. **Overview** - student count, average, highest and lowest score
2. **Performance tiers** - excellent (180+), good (120-179), average (80-119), needs improvement (below 80)
3. **Physical metrics** - height, weight and heart rate statistics
4. **Students to watch** - students who need extra attention
5. **Teaching recommendations** - concrete, actionable suggestions based on the data
6. **Next goals** - measurable targets for the next period

Requirements:
- Markdown only, professional but easy to read
- Accurate numbers taken from the data above
- Use a few emoji to make the report lively

Return the report content only, with no other commentary."#,
            class = snapshot.class_name,
            count = snapshot.student_count,
            roster = roster,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnapshotStudent;

    #[test]
    fn test_prompt_lists_students_and_optional_metrics() {
        let snapshot = ReportSnapshot::new(
            "Grade 3 Class 1",
            vec![
                SnapshotStudent {
                    name: "Leo".into(),
                    score: 150,
                    height: Some(120.0),
                    weight: None,
                    heart_rate: Some(80),
                },
                SnapshotStudent {
                    name: "Ivy".into(),
                    score: 200,
                    height: None,
                    weight: None,
                    heart_rate: None,
                },
            ],
        );

        let prompt = PromptBuilder::report_prompt(&snapshot);

        assert!(prompt.contains("\"Grade 3 Class 1\""));
        assert!(prompt.contains("Number of students: 2"));
        assert!(prompt.contains("1. Leo - score: 150, height: 120cm, heart rate: 80bpm"));
        assert!(prompt.contains("2. Ivy - score: 200\n"));
        assert!(!prompt.contains("weight: "));
    }
}
