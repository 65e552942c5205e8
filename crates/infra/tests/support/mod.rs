//! Shared helpers for `tochka-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tochka_domain::{Config, CustomerMode, CustomerTokens, TokenKind, TokenMap, TokenSlot};
use tochka_infra::{MemoryTokenStore, TochkaClient};
use wiremock::MockServer;

pub const CUSTOMER: &str = "300000092";

/// Config pointing both the API and the identity server at `server`.
pub fn config_for(server: &MockServer, mode: CustomerMode) -> Config {
    let mut config = Config::new("app-id", "app-secret");
    config.client.base_url = format!("{}/uapi", server.uri());
    config.client.auth_url = format!("{}/connect", server.uri());
    config.client.redirect_uri = Some("https://app.example/callback".to_string());
    config.client.customer_mode = mode;
    config.http.timeout_seconds = 5;
    config.http.max_attempts = 3;
    config.tokens.safety_margin_seconds = Some(0);
    config
}

/// Tokens with a live access token and a live refresh token.
pub fn live_tokens(access: &str) -> CustomerTokens {
    let mut tokens = CustomerTokens::default();
    tokens.set(TokenKind::Access, TokenSlot::issue(access, Duration::from_secs(3600), Duration::ZERO));
    tokens.set(TokenKind::Refresh, TokenSlot::issue("refresh-1", Duration::from_secs(86_400), Duration::ZERO));
    tokens
}

/// Tokens whose access token expired an hour ago.
pub fn expired_tokens() -> CustomerTokens {
    let mut tokens = live_tokens("stale-access");
    let issued = Utc::now() - chrono::Duration::hours(2);
    tokens.set(TokenKind::Access, TokenSlot::issued_at("stale-access", issued, Duration::from_secs(3600), Duration::ZERO));
    tokens
}

pub fn single(customer: &str, tokens: CustomerTokens) -> TokenMap {
    let mut map = TokenMap::new();
    map.insert(customer.to_string(), tokens);
    map
}

/// Initialized client over an in-memory store seeded with `tokens`.
pub async fn client_with(config: &Config, tokens: TokenMap) -> (TochkaClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::with_tokens(tokens));
    let client = TochkaClient::new(config, store.clone()).expect("client should build");
    client.initialize().await.expect("token cache should load");
    (client, store)
}

/// `{"Data": data}`
pub fn envelope(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "Data": data, "Links": {}, "Meta": {"totalPages": 1} })
}
