//! Token cache errors

use thiserror::Error;
use tochka_domain::TochkaError;

/// Failure of a [`TokenStore`](super::ports::TokenStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenStoreError {
    /// The persisted data is not a token map (bad encoding or payload).
    #[error("Token store is corrupted: {0}")]
    Corrupted(String),

    /// The persisted data does not authenticate under the configured key.
    #[error("Token store could not be decrypted: {0}")]
    Decryption(String),

    /// Reading or writing the backing storage failed.
    #[error("Token store I/O failed: {0}")]
    Io(String),
}

/// Errors raised by [`TokenManager`](super::service::TokenManager).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),

    #[error("No customer selected; name one explicitly")]
    NoCustomerSelected,

    #[error("No access token for customer {0}")]
    NoAccessToken(String),

    #[error("No refresh token for customer {0}")]
    NoRefreshToken(String),

    #[error("Refresh token for customer {0} has expired; authorize again")]
    RefreshExpired(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error(transparent)]
    Store(#[from] TokenStoreError),
}

impl TokenError {
    /// True when only a fresh authorization by the customer can recover.
    pub fn requires_authorization(&self) -> bool {
        matches!(
            self,
            Self::UnknownCustomer(_)
                | Self::NoAccessToken(_)
                | Self::NoRefreshToken(_)
                | Self::RefreshExpired(_)
        )
    }
}

impl From<TokenStoreError> for TochkaError {
    fn from(err: TokenStoreError) -> Self {
        match err {
            TokenStoreError::Decryption(_) => Self::Security(err.to_string()),
            TokenStoreError::Corrupted(_) | TokenStoreError::Io(_) => Self::Storage(err.to_string()),
        }
    }
}

impl From<TokenError> for TochkaError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Store(store) => store.into(),
            TokenError::NoCustomerSelected => Self::InvalidInput(err.to_string()),
            TokenError::RefreshFailed(_) => Self::Network(err.to_string()),
            _ => Self::Auth(err.to_string()),
        }
    }
}
