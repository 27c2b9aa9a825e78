use crate::Result;

/// A remote text-generation backend.
///
/// Implementations are treated as unreliable: any error is absorbed by the
/// report generator, which moves on to the next provider or the template.
#[async_trait::async_trait]
pub trait TextProvider: Send + Sync {
    /// Short, stable identifier used in logs and responses.
    fn name(&self) -> &str;

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    async fn health_check(&self) -> Result<bool>;
}
