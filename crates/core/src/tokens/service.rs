//! Token manager with refresh on demand
//!
//! Manages the OAuth token lifecycle of every known customer:
//! - Snapshot reads and single-slot writes
//! - Whole-map persistence through a [`TokenStore`] after each write
//! - Refresh of an expired access token through a [`TokenRefresher`]
//!
//! The store is read before the first read or write. Until a load succeeds
//! every write is refused, so a map that never saw the persisted contents
//! cannot replace them.
//!
//! Refreshes are serialized: callers that all observe an expired token wait
//! on one mutex, re-check after acquiring it, and only the first one calls
//! the refresher.

use std::sync::Arc;
use std::time::Duration;

use tochka_domain::constants::REFRESH_TOKEN_TTL_SECS;
use tochka_domain::{CustomerTokens, TokenGrant, TokenKind, TokenMap, TokenSlot};
use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

use super::errors::TokenError;
use super::ports::{TokenRefresher, TokenStore};

#[derive(Default)]
struct Cache {
    map: TokenMap,
    loaded: bool,
}

/// Per-customer token cache backed by a [`TokenStore`]
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    cache: RwLock<Cache>,
    refresh_lock: Mutex<()>,
    safety_margin: Duration,
    refresh_ttl: Duration,
}

impl TokenManager {
    /// Create a token manager; the store is read on first use
    ///
    /// # Arguments
    /// * `store` - where the token map is persisted
    /// * `refresher` - exchanges refresh tokens for new grants
    /// * `safety_margin` - subtracted from every TTL when computing expiry
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        refresher: Arc<dyn TokenRefresher>,
        safety_margin: Duration,
    ) -> Self {
        Self {
            store,
            refresher,
            cache: RwLock::new(Cache::default()),
            refresh_lock: Mutex::new(()),
            safety_margin,
            refresh_ttl: Duration::from_secs(REFRESH_TOKEN_TTL_SECS),
        }
    }

    /// Override the lifetime assumed for refresh tokens (default 30 days).
    #[must_use]
    pub const fn with_refresh_ttl(mut self, refresh_ttl: Duration) -> Self {
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Margin subtracted from every TTL when a slot is issued.
    pub const fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    /// Replace the in-memory map with the store's contents
    ///
    /// Returns the number of customers loaded.
    ///
    /// # Errors
    /// Returns the store error. The in-memory map is left untouched, but
    /// writes are refused until a later load succeeds.
    pub async fn load(&self) -> Result<usize, TokenError> {
        let mut cache = self.cache.write().await;
        cache.loaded = false;
        Self::fill(&*self.store, &mut cache).await
    }

    async fn fill(store: &dyn TokenStore, cache: &mut Cache) -> Result<usize, TokenError> {
        let loaded = store.load().await.map_err(|err| {
            warn!(error = %err, "Token store could not be loaded; writes are refused");
            err
        })?;
        let count = loaded.len();
        cache.map = loaded;
        cache.loaded = true;
        info!(customers = count, "Token cache loaded");
        Ok(count)
    }

    /// Write access to a cache that reflects the store.
    async fn loaded_cache(&self) -> Result<RwLockWriteGuard<'_, Cache>, TokenError> {
        let mut cache = self.cache.write().await;
        if !cache.loaded {
            Self::fill(&*self.store, &mut cache).await?;
        }
        Ok(cache)
    }

    /// Snapshot of one customer's tokens
    ///
    /// With `allow_create`, an unknown customer gets an empty entry (kept in
    /// memory only until the first write).
    ///
    /// # Errors
    /// - [`TokenError::UnknownCustomer`] when the customer is unknown and
    ///   `allow_create` is false
    /// - the store error when the persisted map cannot be loaded
    pub async fn get(&self, customer: &str, allow_create: bool) -> Result<CustomerTokens, TokenError> {
        {
            let cache = self.cache.read().await;
            if cache.loaded {
                if let Some(tokens) = cache.map.get(customer) {
                    return Ok(tokens.clone());
                }
                if !allow_create {
                    return Err(TokenError::UnknownCustomer(customer.to_string()));
                }
            }
        }

        let mut cache = self.loaded_cache().await?;
        if !allow_create && !cache.map.contains_key(customer) {
            return Err(TokenError::UnknownCustomer(customer.to_string()));
        }
        Ok(cache.map.entry(customer.to_string()).or_default().clone())
    }

    /// Set one slot and persist the whole map
    ///
    /// # Errors
    /// Returns the store error; on failure the in-memory map is unchanged.
    pub async fn set(
        &self,
        customer: &str,
        kind: TokenKind,
        secret: impl Into<String> + Send,
        ttl: Duration,
    ) -> Result<CustomerTokens, TokenError> {
        let slot = TokenSlot::issue(secret, ttl, self.safety_margin);
        self.update(customer, |tokens| tokens.set(kind, slot)).await
    }

    /// Store the access and refresh tokens of an OAuth grant in one write
    ///
    /// A grant without a refresh token keeps the existing refresh slot.
    ///
    /// # Errors
    /// Returns the store error; on failure the in-memory map is unchanged.
    pub async fn set_grant(&self, customer: &str, grant: &TokenGrant) -> Result<CustomerTokens, TokenError> {
        let access = TokenSlot::issue(grant.access_token.clone(), grant.expires_in(), self.safety_margin);
        let refresh = grant
            .refresh_token
            .as_ref()
            .map(|secret| TokenSlot::issue(secret.clone(), self.refresh_ttl, self.safety_margin));

        self.update(customer, |tokens| {
            tokens.set(TokenKind::Access, access);
            if let Some(refresh) = refresh {
                tokens.set(TokenKind::Refresh, refresh);
            }
        })
        .await
    }

    /// Forget a customer and persist the map
    ///
    /// Returns whether the customer was known.
    pub async fn remove(&self, customer: &str) -> Result<bool, TokenError> {
        let mut cache = self.loaded_cache().await?;
        if !cache.map.contains_key(customer) {
            return Ok(false);
        }

        let mut next = cache.map.clone();
        next.remove(customer);
        self.store.save(&next).await?;
        cache.map = next;
        info!(customer = %customer, "Customer tokens removed");
        Ok(true)
    }

    /// Known customer codes, in order
    ///
    /// Empty while the store cannot be loaded.
    pub async fn customers(&self) -> Vec<String> {
        self.customers_where(|_| true).await
    }

    /// Customers holding an access or refresh token, in order.
    pub async fn authorized_customers(&self) -> Vec<String> {
        self.customers_where(CustomerTokens::is_authorized).await
    }

    async fn customers_where(&self, keep: impl Fn(&CustomerTokens) -> bool) -> Vec<String> {
        match self.loaded_cache().await {
            Ok(cache) => cache
                .map
                .iter()
                .filter(|(_, tokens)| keep(tokens))
                .map(|(customer, _)| customer.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// A live access token for `customer`, refreshing it if needed
    ///
    /// # Errors
    /// - [`TokenError::UnknownCustomer`] / [`TokenError::NoAccessToken`] when
    ///   the customer never authorized
    /// - [`TokenError::NoRefreshToken`] / [`TokenError::RefreshExpired`] when
    ///   the access token expired and cannot be renewed
    /// - the refresher's or store's error otherwise
    pub async fn access_token(&self, customer: &str) -> Result<String, TokenError> {
        let tokens = self.get(customer, false).await?;
        match tokens.access {
            None => Err(TokenError::NoAccessToken(customer.to_string())),
            Some(slot) if slot.is_alive() => Ok(slot.secret),
            Some(_) => {
                debug!(customer = %customer, "Access token expired, refreshing");
                let refreshed = self.refresh_if_expired(customer).await?;
                refreshed
                    .access
                    .map(|slot| slot.secret)
                    .ok_or_else(|| TokenError::NoAccessToken(customer.to_string()))
            }
        }
    }

    /// Refresh `customer`'s tokens unconditionally
    ///
    /// # Errors
    /// Same refresh errors as [`TokenManager::access_token`].
    pub async fn refresh(&self, customer: &str) -> Result<CustomerTokens, TokenError> {
        let _guard = self.refresh_lock.lock().await;
        let tokens = self.get(customer, false).await?;
        self.refresh_locked(customer, &tokens).await
    }

    async fn refresh_if_expired(&self, customer: &str) -> Result<CustomerTokens, TokenError> {
        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited.
        let tokens = self.get(customer, false).await?;
        if tokens.access.as_ref().is_some_and(TokenSlot::is_alive) {
            debug!(customer = %customer, "Access token refreshed concurrently");
            return Ok(tokens);
        }

        self.refresh_locked(customer, &tokens).await
    }

    async fn refresh_locked(
        &self,
        customer: &str,
        tokens: &CustomerTokens,
    ) -> Result<CustomerTokens, TokenError> {
        let refresh = tokens
            .refresh
            .as_ref()
            .ok_or_else(|| TokenError::NoRefreshToken(customer.to_string()))?;
        if !refresh.is_alive() {
            warn!(customer = %customer, "Refresh token expired");
            return Err(TokenError::RefreshExpired(customer.to_string()));
        }

        let grant = self.refresher.refresh(&refresh.secret).await?;
        let updated = self.set_grant(customer, &grant).await?;
        info!(customer = %customer, expires_in = grant.expires_in, "Access token refreshed");
        Ok(updated)
    }

    async fn update<F>(&self, customer: &str, apply: F) -> Result<CustomerTokens, TokenError>
    where
        F: FnOnce(&mut CustomerTokens) + Send,
    {
        let mut cache = self.loaded_cache().await?;
        let mut next = cache.map.clone();
        let entry = next.entry(customer.to_string()).or_default();
        apply(entry);
        let updated = entry.clone();

        self.store.save(&next).await?;
        cache.map = next;
        Ok(updated)
    }
}
