//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Tochka client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TochkaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TochkaError {
    /// The customer has to sign a new consent before the call can succeed.
    pub const fn requires_authorization(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Transport failures worth repeating later.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// The token file exists but cannot be used as-is.
    pub const fn is_token_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Security(_))
    }
}

/// Result type alias for Tochka operations
pub type Result<T> = std::result::Result<T, TochkaError>;
