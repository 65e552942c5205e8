//! API-specific error types
//!
//! Classifies failed bank API calls by HTTP status and transport failure.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tochka_core::TokenError;
use tochka_domain::TochkaError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401/403 or a token that cannot be renewed; re-authorize
    Authentication,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx, malformed input
    Client,
    /// Connection failures and timeouts
    Network,
    /// Response body did not match the expected model
    Decode,
    /// Configuration errors
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl ApiError {
    /// Map a non-success response to an error.
    ///
    /// The message is the body's JSON `message` field when present, otherwise
    /// the raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string());
        let status = status.as_u16();

        match status {
            401 | 403 => Self::Unauthorized { status, message },
            500..=599 => Self::Server { status, message },
            _ => Self::Status { status, message },
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Unauthorized { .. } => ApiErrorCategory::Authentication,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Status { status: 429, .. } => ApiErrorCategory::RateLimit,
            Self::Status { .. } | Self::InvalidInput(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Token(err) => match err {
                TokenError::Store(_) => ApiErrorCategory::Config,
                TokenError::RefreshFailed(_) => ApiErrorCategory::Network,
                TokenError::NoCustomerSelected => ApiErrorCategory::Client,
                _ => ApiErrorCategory::Authentication,
            },
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. }
            | Self::Server { status, .. }
            | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the customer has to go through the consent flow again.
    pub fn requires_authorization(&self) -> bool {
        match self {
            Self::Unauthorized { .. } => true,
            Self::Token(err) => err.requires_authorization(),
            _ => false,
        }
    }
}

impl From<TochkaError> for ApiError {
    fn from(err: TochkaError) -> Self {
        match err {
            TochkaError::Network(message) => Self::Network(message),
            TochkaError::Config(message) => Self::Config(message),
            TochkaError::InvalidInput(message) | TochkaError::NotFound(message) => {
                Self::InvalidInput(message)
            }
            TochkaError::Auth(message) | TochkaError::Security(message) => {
                Self::Unauthorized { status: 401, message }
            }
            TochkaError::Storage(message) | TochkaError::Internal(message) => {
                Self::Config(message)
            }
        }
    }
}

impl From<ApiError> for TochkaError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => Self::Auth(err.to_string()),
            ApiError::Server { .. } | ApiError::Network(_) | ApiError::Timeout(_) => {
                Self::Network(err.to_string())
            }
            ApiError::Status { status: 404, .. } => Self::NotFound(err.to_string()),
            ApiError::Status { .. } | ApiError::InvalidInput(_) => {
                Self::InvalidInput(err.to_string())
            }
            ApiError::Decode(_) => Self::Internal(err.to_string()),
            ApiError::Config(message) => Self::Config(message),
            ApiError::Token(token) => token.into(),
        }
    }
}
