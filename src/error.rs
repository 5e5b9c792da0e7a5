use thiserror::Error;

/// Failures talking to the listings backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("listing not found: {0}")]
    NotFound(String),

    #[error("backend returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures reading or writing the state store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state value is not valid JSON for its key: {0}")]
    Serde(#[from] serde_json::Error),
}
