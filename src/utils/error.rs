use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Rate limited by {url}")]
    RateLimited { url: String },

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("No item_nameid pattern matched in {url}")]
    PatternNotFound { url: String },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Notification failed via {channel}: status {status}")]
    Notification { channel: String, status: u16 },
}

impl AppError {
    /// Throttling is a backoff signal, every other failure bumps the health error counter.
    pub fn is_throttle(&self) -> bool {
        matches!(self, AppError::RateLimited { .. })
    }
}
