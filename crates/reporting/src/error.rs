use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Text generation provider error: {0}")]
    ExternalService(String),

    #[error("Text generation timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
