use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{error_detail, http_client};
use crate::{ReportError, Result, TextProvider};

#[derive(Debug, Clone, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Clone, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: i32,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    total_duration: Option<i64>,
}

/// Client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// # Arguments
    /// * `base_url` - Base URL of Ollama API (e.g., "http://localhost:11434")
    /// * `model` - Model name (e.g., "qwen2.5:7b")
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[async_trait::async_trait]
impl TextProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt: user_prompt,
            system: system_prompt,
            stream: false,
            options: OllamaOptions {
                temperature: 0.7,
                num_predict: 2000,
            },
        };

        tracing::info!(
            "Sending request to Ollama (model: {}, prompt length: {} chars)",
            self.model,
            user_prompt.len()
        );
        let started = Instant::now();

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::ExternalService(format!(
                "Ollama API error: {}",
                error_detail(response).await
            )));
        }

        let body: OllamaGenerateResponse = response.json().await?;

        tracing::info!(
            "Ollama generation complete: {:.2}s wall, {:?}ns reported, {} chars output",
            started.elapsed().as_secs_f64(),
            body.total_duration,
            body.response.len()
        );

        Ok(body.response)
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Only run when Ollama is running
    async fn test_ollama_health_check() {
        let client = OllamaClient::new(
            "http://localhost:11434".into(),
            "qwen2.5:7b".into(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(client.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let client = OllamaClient::new(
            "http://127.0.0.1:9".into(),
            "qwen2.5:7b".into(),
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(client.generate("system", "prompt").await.is_err());
    }
}
