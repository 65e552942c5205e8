//! Port interfaces for the token cache
//!
//! These traits define the boundaries between the token lifecycle logic and
//! its infrastructure: where the token map is persisted and who exchanges a
//! refresh token for a new grant.

use async_trait::async_trait;
use tochka_domain::{TokenGrant, TokenMap};

use super::errors::{TokenError, TokenStoreError};

/// Persistence for the whole token map
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the persisted map; an absent store yields an empty map.
    async fn load(&self) -> Result<TokenMap, TokenStoreError>;

    /// Replace the persisted map with `tokens`.
    async fn save(&self, tokens: &TokenMap) -> Result<(), TokenStoreError>;
}

/// Exchanges a refresh token for a new grant
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenError>;
}
