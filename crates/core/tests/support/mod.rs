//! Shared test helpers for `tochka-core` integration tests.
//!
//! In-memory doubles for the token ports that record how they were used.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tochka_core::{TokenError, TokenManager, TokenRefresher, TokenStore, TokenStoreError};
use tochka_domain::{TokenGrant, TokenMap};

/// Store that keeps the last saved map and counts saves.
#[derive(Default)]
pub struct RecordingStore {
    saved: Mutex<TokenMap>,
    saves: AtomicUsize,
    fail_saves: Mutex<bool>,
    fail_loads: Mutex<bool>,
}

impl RecordingStore {
    pub fn seeded(tokens: TokenMap) -> Self {
        Self { saved: Mutex::new(tokens), ..Self::default() }
    }

    pub fn saved(&self) -> TokenMap {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }

    /// Make `load` fail the way an undecryptable file does.
    pub fn fail_loads(&self, fail: bool) {
        *self.fail_loads.lock().unwrap() = fail;
    }
}

#[async_trait]
impl TokenStore for RecordingStore {
    async fn load(&self) -> Result<TokenMap, TokenStoreError> {
        if *self.fail_loads.lock().unwrap() {
            return Err(TokenStoreError::Decryption("aead::Error".to_string()));
        }
        Ok(self.saved())
    }

    async fn save(&self, tokens: &TokenMap) -> Result<(), TokenStoreError> {
        if *self.fail_saves.lock().unwrap() {
            return Err(TokenStoreError::Io("disk full".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.saved.lock().unwrap() = tokens.clone();
        Ok(())
    }
}

/// Refresher that hands out numbered grants after an optional delay.
pub struct ScriptedRefresher {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    delay: Duration,
    expires_in: u64,
    fail: bool,
}

impl ScriptedRefresher {
    pub fn new(expires_in: u64) -> Self {
        Self { calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()), delay: Duration::ZERO, expires_in, fail: false }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenRefresher for ScriptedRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen.lock().unwrap().push(refresh_token.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(TokenError::RefreshFailed("invalid_grant".to_string()));
        }

        Ok(serde_json::from_value(serde_json::json!({
            "access_token": format!("access-{call}"),
            "refresh_token": format!("refresh-{call}"),
            "expires_in": self.expires_in,
            "token_type": "bearer"
        }))
        .unwrap())
    }
}

/// Manager over the given doubles with a 30 second safety margin.
pub fn manager(store: Arc<RecordingStore>, refresher: Arc<ScriptedRefresher>) -> TokenManager {
    TokenManager::new(store, refresher, Duration::from_secs(30))
}
