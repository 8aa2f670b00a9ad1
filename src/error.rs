//! Error types shared by the API layer, the voice adapter and configuration.

use thiserror::Error;

/// Failure of a backend call made through [`crate::api::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered 401; the user has to sign in again.
    #[error("Unauthorized - please sign in")]
    Unauthorized,

    #[error("API Error: {0}")]
    Status(u16),

    /// No response arrived (DNS, connection refused, CORS, aborted).
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// German copy shown in screen-level error banners.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Nicht angemeldet - bitte melde dich erneut an.".to_string(),
            ApiError::Status(code) => format!("Serverfehler ({code})"),
            ApiError::Network(_) => "Keine Verbindung zum Server.".to_string(),
            ApiError::Decode(_) => "Unerwartete Antwort vom Server.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced inline next to the voice control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("Speech recognition not supported in this browser")]
    Unsupported,

    /// Error code reported by the platform recognizer (`no-speech`, `not-allowed`, ...).
    #[error("{0}")]
    Recognition(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be an absolute http(s) URL, got {value:?}")]
    InvalidUrl { key: &'static str, value: String },
}
