//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use tochka_domain::TochkaError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TochkaError);

impl From<InfraError> for TochkaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TochkaError> for InfraError {
    fn from(value: TochkaError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTochkaError {
    fn into_tochka(self) -> TochkaError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TochkaError */
/* -------------------------------------------------------------------------- */

impl IntoTochkaError for HttpError {
    fn into_tochka(self) -> TochkaError {
        if self.is_timeout() {
            return TochkaError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return TochkaError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return TochkaError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => TochkaError::Auth(message),
                404 => TochkaError::NotFound(message),
                400..=499 => TochkaError::InvalidInput(message),
                _ => TochkaError::Network(message),
            };
        }

        TochkaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_tochka())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TochkaError */
/* -------------------------------------------------------------------------- */

impl IntoTochkaError for std::io::Error {
    fn into_tochka(self) -> TochkaError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => TochkaError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                TochkaError::Security(format!("permission denied: {self}"))
            }
            _ => TochkaError::Storage(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_tochka())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
