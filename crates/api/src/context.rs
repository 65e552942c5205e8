//! Client context
//!
//! Builds the token store the configuration asks for, wires it into a
//! [`TochkaClient`] and loads the cached tokens.

use std::path::PathBuf;
use std::sync::Arc;

use tochka_core::TokenStore;
use tochka_domain::{Config, Result, TochkaError, TokenStorage};
use tochka_infra::api::{CustomerApi, TochkaClient};
use tochka_infra::{config, default_tokens_path, EncryptedFileTokenStore, MemoryTokenStore};
use tracing::info;

/// A configured, initialized client
pub struct TochkaContext {
    pub config: Config,
    pub client: Arc<TochkaClient>,
    store: Arc<dyn TokenStore>,
}

impl TochkaContext {
    /// Context configured from the environment (a `.env` file is honoured) or
    /// the first config file found.
    pub async fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "Loaded .env file");
        }
        Self::new(config::load()?).await
    }

    /// Context with the token store selected by `config.tokens`.
    pub async fn new(config: Config) -> Result<Self> {
        let store = token_store(&config)?;
        Self::with_store(config, store).await
    }

    /// Context over a caller-provided token store
    ///
    /// # Errors
    /// Returns `TochkaError::Security` when the token file does not decrypt
    /// and `TochkaError::Storage` when it is unreadable.
    pub async fn with_store(config: Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let client = TochkaClient::new(&config, store.clone())?;
        let customers = client.initialize().await?;
        info!(
            customers,
            mode = %config.client.customer_mode,
            storage = %config.tokens.storage,
            "Tochka client ready"
        );

        Ok(Self { config, client: Arc::new(client), store })
    }

    pub fn client(&self) -> &TochkaClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Endpoints bound to the active customer.
    pub fn api(&self) -> CustomerApi<'_> {
        self.client.api()
    }

    /// Endpoints bound to `customer_code`.
    pub fn customer(&self, customer_code: impl Into<String>) -> CustomerApi<'_> {
        self.client.customer(customer_code)
    }

    /// Customers with cached tokens.
    pub async fn customers(&self) -> Vec<String> {
        self.client.tokens().customers().await
    }
}

impl std::fmt::Debug for TochkaContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TochkaContext")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

fn token_store(config: &Config) -> Result<Arc<dyn TokenStore>> {
    match config.tokens.storage {
        TokenStorage::Memory => Ok(Arc::new(MemoryTokenStore::new())),
        TokenStorage::EncryptedFile => {
            let path = tokens_path(config)?;
            info!(path = %path.display(), "Using encrypted token file");
            Ok(Arc::new(EncryptedFileTokenStore::new(path, config.tokens_passphrase())))
        }
    }
}

fn tokens_path(config: &Config) -> Result<PathBuf> {
    match &config.tokens.path {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_tokens_path(&config.client.client_id).ok_or_else(|| {
            TochkaError::Config(
                "No data directory on this platform; set tokens.path".to_string(),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_tokens_path_wins() {
        let mut config = Config::new("app-id", "secret");
        config.tokens.path = Some("/srv/shop/tokens.json".to_string());

        assert_eq!(tokens_path(&config).unwrap(), PathBuf::from("/srv/shop/tokens.json"));
    }

    #[test]
    fn default_tokens_path_depends_on_client() {
        let config = Config::new("app-id", "secret");

        if let Ok(path) = tokens_path(&config) {
            assert_eq!(Some(path), default_tokens_path("app-id"));
        }
    }
}
