use async_trait::async_trait;
use tochka_core::{TokenStore, TokenStoreError};
use tochka_domain::TokenMap;
use tokio::sync::RwLock;

/// Token store that keeps the map in memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<TokenMap>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out holding `tokens`.
    pub fn with_tokens(tokens: TokenMap) -> Self {
        Self { tokens: RwLock::new(tokens) }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<TokenMap, TokenStoreError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &TokenMap) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = tokens.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tochka_domain::{CustomerTokens, TokenKind, TokenSlot};

    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryTokenStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let mut tokens = CustomerTokens::default();
        tokens.set(TokenKind::Access, TokenSlot::issue("a", Duration::from_secs(60), Duration::ZERO));
        let mut map = TokenMap::new();
        map.insert("300000092".to_string(), tokens);

        store.save(&map).await.unwrap();
        assert_eq!(store.load().await.unwrap(), map);
    }
}
