use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-2xx HTTP status. The raw body is kept so the gateway can still
    /// decode an exchange error envelope from it.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Exchange-side rejection. `message` is the exchange's text, unmodified.
    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Unrecognized pair format: {0}")]
    UnrecognizedPairFormat(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Operation cancelled")]
    Cancelled,
}

/// OKX envelope codes that signal request throttling rather than a rejection.
const OKX_RATE_LIMIT_CODES: &[&str] = &["50011", "50061"];

impl ExchangeError {
    /// Build an application error from an exchange code and message.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// HTTP 429, or an exchange code that means the same thing.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => *status == 429,
            Self::ApiError { code, .. } => OKX_RATE_LIMIT_CODES.contains(&code.as_str()),
            _ => false,
        }
    }

    /// Failures where repeating the same idempotent read can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_) | Self::HttpStatus { .. } | Self::NetworkError(_)
        ) || self.is_rate_limited()
    }

    /// The exchange's own message for application errors.
    pub fn exchange_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message, .. } => Some(message),
            _ => None,
        }
    }
}
