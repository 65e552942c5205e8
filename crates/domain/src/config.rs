//! Configuration management

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTH_URL, DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_ATTEMPTS,
};
use crate::impl_domain_status_conversions;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
}

impl Config {
    /// Configuration with the given credentials and defaults everywhere else.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client: ClientConfig::new(client_id, client_secret),
            http: HttpConfig::default(),
            tokens: TokenConfig::default(),
        }
    }

    /// Margin subtracted from every token TTL.
    ///
    /// Defaults to the HTTP timeout so a token cannot expire while a request
    /// carrying it is still in flight.
    pub fn safety_margin(&self) -> Duration {
        self.tokens
            .safety_margin_seconds
            .map_or_else(|| self.http.timeout(), Duration::from_secs)
    }

    /// Passphrase protecting the encrypted token file.
    pub fn tokens_passphrase(&self) -> &str {
        self.tokens.passphrase.as_deref().unwrap_or(&self.client.client_id)
    }
}

/// OAuth application credentials and endpoints
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    #[serde(skip_serializing, default)]
    pub client_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub customer_mode: CustomerMode,
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: default_base_url(),
            auth_url: default_auth_url(),
            redirect_uri: None,
            customer_mode: CustomerMode::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("auth_url", &self.auth_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("customer_mode", &self.customer_mode)
            .finish()
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_attempts: default_max_attempts(),
            user_agent: None,
        }
    }
}

/// Token cache configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default)]
    pub storage: TokenStorage,
    /// Overrides the per-client default file location.
    #[serde(default)]
    pub path: Option<String>,
    /// Defaults to the OAuth client id.
    #[serde(skip_serializing, default)]
    pub passphrase: Option<String>,
    #[serde(default)]
    pub safety_margin_seconds: Option<u64>,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("storage", &self.storage)
            .field("path", &self.path)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .field("safety_margin_seconds", &self.safety_margin_seconds)
            .finish()
    }
}

/// How requests pick the customer whose tokens they use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerMode {
    /// One customer per client; it is selected implicitly.
    #[default]
    Single,
    /// Every request names its customer.
    Multi,
}

impl_domain_status_conversions!(CustomerMode {
    Single => "single",
    Multi => "multi",
});

/// Where the token map is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStorage {
    Memory,
    #[default]
    EncryptedFile,
}

impl_domain_status_conversions!(TokenStorage {
    Memory => "memory",
    EncryptedFile => "encrypted_file",
});

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

const fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}
