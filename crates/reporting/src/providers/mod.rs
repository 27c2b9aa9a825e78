pub mod anthropic;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use std::time::Duration;

use reqwest::Client;

use crate::{ReportError, Result};

/// Shared HTTP client with the request timeout applied to every call.
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("classroom-points/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ReportError::from)
}

/// Read an error body for logging, keeping it short.
pub(crate) async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(300).collect();
    format!("{} {}", status, body)
}
