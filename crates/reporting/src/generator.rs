use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::prompts::PromptBuilder;
use crate::stats::ClassStatistics;
use crate::{ReportError, ReportSnapshot, Result, TextProvider, template};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Ai,
    Template,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Report {
    /// Markdown body
    pub markdown: String,
    pub source: ReportSource,
    /// Provider that wrote the report, absent for template output
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProviderStatus {
    pub name: String,
    pub healthy: bool,
    pub error: Option<String>,
}

/// Produces a class report from a snapshot.
///
/// Each configured provider gets one attempt, in order, bounded by
/// `timeout`. When all of them fail the deterministic template is used,
/// so `generate` only errors on invalid input.
pub struct ReportGenerator {
    providers: Vec<Box<dyn TextProvider>>,
    timeout: Duration,
}

impl ReportGenerator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn TextProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn generate(&self, snapshot: &ReportSnapshot) -> Result<Report> {
        snapshot
            .validate()
            .map_err(|e| ReportError::InvalidInput(e.to_string()))?;
        if snapshot.students.is_empty() {
            return Err(ReportError::InvalidInput(
                "cannot build a report for a class without students".to_string(),
            ));
        }

        let system_prompt = PromptBuilder::system_prompt();
        let user_prompt = PromptBuilder::report_prompt(snapshot);

        for provider in &self.providers {
            match self.attempt(provider.as_ref(), system_prompt, &user_prompt).await {
                Ok(markdown) => {
                    tracing::info!(
                        "Report for '{}' generated by {}",
                        snapshot.class_name,
                        provider.name()
                    );
                    return Ok(Report {
                        markdown,
                        source: ReportSource::Ai,
                        provider: Some(provider.name().to_string()),
                    });
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {}", provider.name(), e);
                }
            }
        }

        if self.has_providers() {
            tracing::warn!(
                "All providers failed for '{}', using template report",
                snapshot.class_name
            );
        } else {
            tracing::info!(
                "No providers configured, using template report for '{}'",
                snapshot.class_name
            );
        }

        Self::fallback(snapshot, Utc::now())
    }

    /// Template report for `snapshot`, stamped with `now`.
    pub fn fallback(snapshot: &ReportSnapshot, now: DateTime<Utc>) -> Result<Report> {
        let stats = ClassStatistics::compute(snapshot)?;
        Ok(Report {
            markdown: template::render(&snapshot.class_name, &stats, now),
            source: ReportSource::Template,
            provider: None,
        })
    }

    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        let mut statuses = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let status = match tokio::time::timeout(self.timeout, provider.health_check()).await {
                Ok(Ok(healthy)) => ProviderStatus {
                    name: provider.name().to_string(),
                    healthy,
                    error: None,
                },
                Ok(Err(e)) => ProviderStatus {
                    name: provider.name().to_string(),
                    healthy: false,
                    error: Some(e.to_string()),
                },
                Err(_) => ProviderStatus {
                    name: provider.name().to_string(),
                    healthy: false,
                    error: Some(ReportError::Timeout(self.timeout.as_secs()).to_string()),
                },
            };
            statuses.push(status);
        }
        statuses
    }

    async fn attempt(
        &self,
        provider: &dyn TextProvider,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let text = tokio::time::timeout(self.timeout, provider.generate(system_prompt, user_prompt))
            .await
            .map_err(|_| ReportError::Timeout(self.timeout.as_secs()))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(ReportError::ExternalService(format!(
                "{} returned an empty report",
                provider.name()
            )));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnapshotStudent;
    use crate::template::GENERATED_AT_PREFIX;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct StubProvider {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl StubProvider {
        fn boxed(name: &'static str, behaviour: Behaviour) -> (Box<dyn TextProvider>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider: Box<dyn TextProvider> = Box::new(Self {
                name,
                behaviour,
                calls: calls.clone(),
            });
            (provider, calls)
        }
    }

    #[async_trait::async_trait]
    impl TextProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Reply(text) => Ok(text.to_string()),
                Behaviour::Fail => Err(ReportError::ExternalService("503 Service Unavailable".into())),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("too late".to_string())
                }
            }
        }

        async fn health_check(&self) -> Result<bool> {
            match self.behaviour {
                Behaviour::Fail => Err(ReportError::ExternalService("unreachable".into())),
                _ => Ok(true),
            }
        }
    }

    fn snapshot() -> ReportSnapshot {
        ReportSnapshot::new(
            "Grade 3 Class 1",
            [("Leo", 150), ("Ivy", 200), ("Max", 120), ("Amy", 180), ("Tom", 95)]
                .into_iter()
                .map(|(name, score)| SnapshotStudent {
                    name: name.to_string(),
                    score,
                    height: None,
                    weight: None,
                    heart_rate: None,
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins() {
        let (failing, failing_calls) = StubProvider::boxed("openai", Behaviour::Fail);
        let (working, working_calls) = StubProvider::boxed("anthropic", Behaviour::Reply("# AI report\n"));
        let (unused, unused_calls) = StubProvider::boxed("ollama", Behaviour::Reply("# other"));
        let generator = ReportGenerator::new(Duration::from_secs(1))
            .with_provider(failing)
            .with_provider(working)
            .with_provider(unused);

        let report = generator.generate(&snapshot()).await.unwrap();

        assert_eq!(report.source, ReportSource::Ai);
        assert_eq!(report.provider.as_deref(), Some("anthropic"));
        assert_eq!(report.markdown, "# AI report");
        assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
        assert_eq!(working_calls.load(Ordering::SeqCst), 1);
        assert_eq!(unused_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_template() {
        let (failing, calls) = StubProvider::boxed("openai", Behaviour::Fail);
        let generator = ReportGenerator::new(Duration::from_secs(1)).with_provider(failing);

        let report = generator.generate(&snapshot()).await.unwrap();

        assert_eq!(report.source, ReportSource::Template);
        assert_eq!(report.provider, None);
        assert!(report.markdown.contains("- **Average score**: 149"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let (hanging, _) = StubProvider::boxed("ollama", Behaviour::Hang);
        let generator = ReportGenerator::new(Duration::from_secs(5)).with_provider(hanging);

        let report = generator.generate(&snapshot()).await.unwrap();

        assert_eq!(report.source, ReportSource::Template);
    }

    #[tokio::test]
    async fn test_blank_response_counts_as_failure() {
        let (blank, _) = StubProvider::boxed("openai", Behaviour::Reply("  \n "));
        let generator = ReportGenerator::new(Duration::from_secs(1)).with_provider(blank);

        let report = generator.generate(&snapshot()).await.unwrap();

        assert_eq!(report.source, ReportSource::Template);
    }

    #[tokio::test]
    async fn test_no_providers_uses_template() {
        let generator = ReportGenerator::new(Duration::from_secs(1));
        assert!(!generator.has_providers());

        let report = generator.generate(&snapshot()).await.unwrap();
        assert_eq!(report.source, ReportSource::Template);
    }

    #[tokio::test]
    async fn test_invalid_snapshots_are_rejected() {
        let generator = ReportGenerator::new(Duration::from_secs(1));

        let empty = ReportSnapshot::new("Grade 3 Class 1", Vec::new());
        assert!(matches!(
            generator.generate(&empty).await,
            Err(ReportError::InvalidInput(_))
        ));

        let mut mismatched = snapshot();
        mismatched.student_count = 9;
        assert!(matches!(
            generator.generate(&mismatched).await,
            Err(ReportError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fallback_is_deterministic_for_fixed_time() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();

        let first = ReportGenerator::fallback(&snapshot(), at).unwrap();
        let second = ReportGenerator::fallback(&snapshot(), at).unwrap();

        assert_eq!(first.markdown, second.markdown);
        assert!(first.markdown.lines().any(|l| l.starts_with(GENERATED_AT_PREFIX)));
    }

    #[tokio::test]
    async fn test_provider_status_reports_each_provider() {
        let (up, _) = StubProvider::boxed("openai", Behaviour::Reply("x"));
        let (down, _) = StubProvider::boxed("ollama", Behaviour::Fail);
        let generator = ReportGenerator::new(Duration::from_secs(1))
            .with_provider(up)
            .with_provider(down);

        let statuses = generator.provider_status().await;

        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].healthy);
        assert_eq!(statuses[1].name, "ollama");
        assert!(!statuses[1].healthy);
        assert!(statuses[1].error.as_deref().unwrap_or("").contains("unreachable"));
    }

    #[test]
    fn test_report_source_serializes_snake_case() {
        let value = serde_json::to_value(ReportSource::Template).unwrap();
        assert_eq!(value, serde_json::json!("template"));
    }
}
