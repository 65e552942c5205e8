//! Common error types shared by the lower layers.
//!
//! `CommonError` covers the failures of the encryption primitives. Callers
//! classify it with [`CommonError::is_serialization`] and
//! [`CommonError::is_decryption`]: a malformed payload and a wrong key call
//! for different handling.
//!
//! ```rust
//! use tochka_common::error::CommonError;
//!
//! let err = CommonError::serialization_format("JSON", "unexpected end of input");
//! assert!(err.is_serialization());
//! assert_eq!(err.to_string(), "Serialization error (JSON): unexpected end of input");
//! ```

use thiserror::Error;

/// Result alias used throughout the common crate.
pub type CommonResult<T> = Result<T, CommonError>;

/// Shared error primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Serialization or deserialization errors, including encoding failures
    #[error("Serialization error{}: {message}", format_suffix(.format))]
    Serialization { message: String, format: Option<String> },

    /// Ciphertext did not authenticate under the supplied key
    #[error("Decryption failed: {message}")]
    Decryption { message: String },

    /// Validation errors
    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Internal errors that shouldn't normally occur
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_suffix(format: &Option<String>) -> String {
    format.as_ref().map(|f| format!(" ({f})")).unwrap_or_default()
}

impl CommonError {
    /// Create a simple serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization { message: message.into(), format: None }
    }

    /// Create a serialization error with format information
    pub fn serialization_format<S: Into<String>, F: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: Some(format.into()) }
    }

    /// Create a decryption error
    pub fn decryption<S: Into<String>>(message: S) -> Self {
        Self::Decryption { message: message.into() }
    }

    /// Create a validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into() }
    }

    /// True for malformed or undecodable input.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// True when a payload failed authentication.
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption { .. })
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `CommonError` display behavior for the messages name the
    /// failing field scenario.
    ///
    /// Assertions:
    /// - Confirms validation errors name the field.
    /// - Confirms decryption errors are classified as such.
    #[test]
    fn messages_name_the_failing_field() {
        let err = CommonError::validation("key", "Encryption key must be exactly 32 bytes");
        assert_eq!(
            err.to_string(),
            "Validation error for field 'key': Encryption key must be exactly 32 bytes"
        );

        let err = CommonError::decryption("payload failed authentication");
        assert!(err.is_decryption());
        assert!(!err.is_serialization());
    }

    /// Validates `From<serde_json::Error>` behavior for the json errors map to
    /// serialization scenario.
    ///
    /// Assertions:
    /// - Ensures the converted error is a serialization error tagged JSON.
    #[test]
    fn json_errors_map_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CommonError = json_err.into();

        assert!(err.is_serialization());
        assert!(!err.is_decryption());
        assert!(err.to_string().starts_with("Serialization error (JSON)"));
    }
}
