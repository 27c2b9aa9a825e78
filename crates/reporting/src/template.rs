use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::stats::{AVERAGE_MIN, ClassStatistics, EXCELLENT_MIN, GOOD_MIN};

/// Prefix of the only line that changes between two renders of the same snapshot.
pub const GENERATED_AT_PREFIX: &str = "*Generated at: ";

/// Render the fallback markdown report.
pub fn render(class_name: &str, stats: &ClassStatistics, generated_at: DateTime<Utc>) -> String {
    let tiers = &stats.tiers;
    let mut out = String::new();

    let _ = writeln!(out, "# {} Class Report", class_name);
    out.push('\n');

    out.push_str("## 📊 Overview\n");
    let _ = writeln!(out, "- **Students**: {}", stats.student_count);
    let _ = writeln!(out, "- **Average score**: {}", stats.average);
    let _ = writeln!(out, "- **Highest score**: {}", stats.max);
    let _ = writeln!(out, "- **Lowest score**: {}", stats.min);
    let _ = writeln!(out, "- **Score range**: {}", stats.range());
    out.push('\n');

    out.push_str("## 🏆 Performance Tiers\n");
    let _ = writeln!(
        out,
        "- **Excellent ({}+)**: {} ({}%)",
        EXCELLENT_MIN,
        tiers.excellent,
        stats.percent(tiers.excellent)
    );
    let _ = writeln!(
        out,
        "- **Good ({}-{})**: {} ({}%)",
        GOOD_MIN,
        EXCELLENT_MIN - 1,
        tiers.good,
        stats.percent(tiers.good)
    );
    let _ = writeln!(
        out,
        "- **Average ({}-{})**: {} ({}%)",
        AVERAGE_MIN,
        GOOD_MIN - 1,
        tiers.average,
        stats.percent(tiers.average)
    );
    let _ = writeln!(
        out,
        "- **Needs improvement (below {})**: {} ({}%)",
        AVERAGE_MIN,
        tiers.needs_improvement,
        stats.percent(tiers.needs_improvement)
    );
    out.push('\n');

    out.push_str("## 📏 Physical Metrics\n");
    let _ = writeln!(out, "- **Average height**: {}cm", stats.average_height);
    let _ = writeln!(out, "- **Average weight**: {}kg", stats.average_weight);
    let _ = writeln!(out, "- **Average heart rate**: {}bpm", stats.average_heart_rate);
    out.push('\n');

    out.push_str("## 🎯 Students to Watch\n");
    if stats.focus.is_empty() {
        out.push_str("- Every student is doing well!\n");
    } else {
        for student in &stats.focus {
            let _ = writeln!(
                out,
                "- **{}**: {} points (needs more encouragement and support)",
                student.name, student.score
            );
        }
    }
    out.push('\n');

    out.push_str("## 💡 Recommendations\n");
    if tiers.needs_improvement > 0 {
        out.push_str("- Offer extra learning support and encouragement to lower-scoring students\n");
        out.push_str("- Set up study groups so strong students can help those who are catching up\n");
        out.push_str("- Hold regular one-on-one check-ins to understand individual difficulties\n");
    } else {
        out.push_str("- The class is performing well overall, keep it up!\n");
        out.push_str("- Introduce harder challenges to keep students motivated\n");
        out.push_str("- Encourage students to learn from each other\n");
    }
    out.push('\n');

    out.push_str("## 📈 Next Goals\n");
    let _ = writeln!(out, "- Raise the class average to {}", stats.average + 20);
    let _ = writeln!(
        out,
        "- Reduce the number of students needing improvement to {}",
        tiers.needs_improvement.saturating_sub(1)
    );
    let _ = writeln!(
        out,
        "- Keep the share of excellent students at {}% or higher",
        stats.percent(tiers.excellent)
    );
    out.push('\n');

    out.push_str("---\n");
    out.push_str("*This report was produced from a fixed template because AI generation was unavailable.*\n");
    let _ = writeln!(
        out,
        "{}{}*",
        GENERATED_AT_PREFIX,
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    out
}
