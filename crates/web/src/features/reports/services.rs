use reporting::{
    ReportGenerator, ReportSnapshot, SnapshotStudent, TextProvider,
    providers::{AnthropicClient, OllamaClient, OpenAiClient},
};
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use storage::{
    dto::roster::{RosterGroup, RosterStudent},
    error::Result,
    repository::roster::RosterRepository,
};
use uuid::Uuid;

use crate::config::{ProviderConfig, ReportConfig};

/// Build the generator with the configured providers, in order.
pub fn build_report_generator(config: &ReportConfig) -> reporting::Result<ReportGenerator> {
    let mut generator = ReportGenerator::new(config.timeout);

    for provider in &config.providers {
        tracing::debug!("Configuring report provider {}", provider.name());
        let client: Box<dyn TextProvider> = match provider.clone() {
            ProviderConfig::OpenAi {
                api_key,
                base_url,
                model,
            } => Box::new(OpenAiClient::new(api_key, base_url, model, config.timeout)?),
            ProviderConfig::Anthropic {
                api_key,
                base_url,
                model,
            } => Box::new(AnthropicClient::new(api_key, base_url, model, config.timeout)?),
            ProviderConfig::Ollama { base_url, model } => {
                Box::new(OllamaClient::new(base_url, model, config.timeout)?)
            }
        };
        generator = generator.with_provider(client);
    }

    if generator.has_providers() {
        tracing::info!(
            "Report providers, in order: {}",
            generator.provider_names().join(", ")
        );
    } else {
        tracing::info!("No report providers configured, reports will use the template");
    }

    Ok(generator)
}

/// Load one group's snapshot for report generation
pub async fn load_group_snapshot(pool: &PgPool, group_id: Uuid) -> Result<ReportSnapshot> {
    let group = RosterRepository::new(pool).find_group(group_id).await?;
    Ok(snapshot_from_group(group))
}

pub fn snapshot_from_group(group: RosterGroup) -> ReportSnapshot {
    let students = group.students.into_iter().map(snapshot_student).collect();
    ReportSnapshot::new(group.name, students)
}

fn snapshot_student(student: RosterStudent) -> SnapshotStudent {
    SnapshotStudent {
        name: student.name,
        score: i64::from(student.total_score),
        height: student.height.and_then(|h| h.to_f64()),
        weight: student.weight.and_then(|w| w.to_f64()),
        heart_rate: student.heart_rate.map(i64::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::time::Duration;
    use storage::dto::roster::TeacherInfo;

    fn student(name: &str, total_score: i32, height: Option<Decimal>) -> RosterStudent {
        RosterStudent {
            student_id: Uuid::new_v4(),
            group_id: Uuid::nil(),
            name: name.to_string(),
            total_score,
            height,
            weight: None,
            heart_rate: Some(82),
            created_at: Default::default(),
        }
    }

    #[test]
    fn test_snapshot_from_group_keeps_order_and_metrics() {
        let group = RosterGroup {
            group_id: Uuid::nil(),
            name: "Grade 3 Class 1".into(),
            description: None,
            created_at: Default::default(),
            teacher: TeacherInfo {
                user_id: Uuid::new_v4(),
                name: "Ms Zhang".into(),
                email: "zhang@example.com".into(),
            },
            students: vec![
                student("Ivy", 200, Some(Decimal::new(1325, 1))),
                student("Tom", -5, None),
            ],
        };

        let snapshot = snapshot_from_group(group);

        assert_eq!(snapshot.class_name, "Grade 3 Class 1");
        assert_eq!(snapshot.student_count, 2);
        assert_eq!(snapshot.students[0].name, "Ivy");
        assert_eq!(snapshot.students[0].height, Some(132.5));
        assert_eq!(snapshot.students[0].heart_rate, Some(82));
        assert_eq!(snapshot.students[1].score, -5);
        assert_eq!(snapshot.students[1].height, None);
    }

    #[test]
    fn test_generator_follows_configured_order() {
        let config = ReportConfig {
            timeout: Duration::from_secs(3),
            providers: vec![
                ProviderConfig::Ollama {
                    base_url: "http://localhost:11434".into(),
                    model: "qwen2.5:7b".into(),
                },
                ProviderConfig::Anthropic {
                    api_key: "test".into(),
                    base_url: "https://api.anthropic.com".into(),
                    model: "claude-3-sonnet-20240229".into(),
                },
            ],
        };

        let generator = build_report_generator(&config).unwrap();

        assert_eq!(generator.provider_names(), ["ollama", "anthropic"]);
        let configured: Vec<_> = config.providers.iter().map(ProviderConfig::name).collect();
        assert_eq!(generator.provider_names(), configured);
    }
}
