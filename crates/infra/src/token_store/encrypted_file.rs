//! Encrypted token file
//!
//! The whole token map is serialized to JSON and sealed with AES-256-GCM
//! under a key derived from a passphrase with Argon2. The file holds the
//! base64 encoded [`EncryptedData`], salt included, so it can be opened
//! again with the passphrase alone. Writes go to a sibling temp file that
//! is renamed over the original.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tochka_common::crypto::{EncryptedData, EncryptionService};
use tochka_common::CommonError;
use tochka_core::{TokenStore, TokenStoreError};
use tochka_domain::constants::{TOKENS_DIR_NAME, TOKENS_FILE_NAME};
use tochka_domain::TokenMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default token file of `client_id`
///
/// `<data dir>/tochka-api/<first 16 hex chars of sha256(client_id)>/tokens.json`;
/// `None` when the platform has no data directory.
pub fn default_tokens_path(client_id: &str) -> Option<PathBuf> {
    let digest = hex::encode(Sha256::digest(client_id.as_bytes()));
    dirs::data_dir().map(|dir| dir.join(TOKENS_DIR_NAME).join(&digest[..16]).join(TOKENS_FILE_NAME))
}

/// Token store backed by one encrypted file
pub struct EncryptedFileTokenStore {
    path: PathBuf,
    passphrase: String,
    // Key derivation is slow; keep the service once derived.
    service: Mutex<Option<EncryptionService>>,
}

impl EncryptedFileTokenStore {
    pub fn new(path: impl Into<PathBuf>, passphrase: impl Into<String>) -> Self {
        Self { path: path.into(), passphrase: passphrase.into(), service: Mutex::new(None) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn derive(&self, encrypted: Option<EncryptedData>) -> Result<EncryptionService, TokenStoreError> {
        let passphrase = self.passphrase.clone();
        tokio::task::spawn_blocking(move || match encrypted {
            Some(encrypted) => EncryptionService::for_payload(&passphrase, &encrypted),
            None => EncryptionService::from_password(&passphrase),
        })
        .await
        .map_err(|e| TokenStoreError::Io(format!("key derivation task failed: {e}")))?
        .map_err(map_crypto_error)
    }

    async fn write_atomically(&self, contents: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await.map_err(io_error)?;
        restrict_permissions(&tmp).await?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_error)
    }
}

impl std::fmt::Debug for EncryptedFileTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileTokenStore")
            .field("path", &self.path)
            .field("passphrase", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenStore for EncryptedFileTokenStore {
    async fn load(&self) -> Result<TokenMap, TokenStoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No token file yet");
                return Ok(TokenMap::new());
            }
            Err(err) => return Err(io_error(err)),
        };

        let encrypted = EncryptedData::decode(contents.trim()).map_err(map_crypto_error)?;
        let mut service = self.service.lock().await;
        let cached = service.take().filter(|cached| {
            cached.password_salt().is_some() && cached.password_salt() == encrypted.salt.as_deref()
        });
        let derived = match cached {
            Some(cached) => cached,
            None => self.derive(Some(encrypted.clone())).await?,
        };
        let plaintext = derived.decrypt(&encrypted).map_err(|err| {
            warn!(path = %self.path.display(), "Token file does not decrypt with the configured passphrase");
            map_crypto_error(err)
        })?;
        *service = Some(derived);

        let tokens: TokenMap = serde_json::from_slice(&plaintext)
            .map_err(|e| TokenStoreError::Corrupted(format!("token map: {e}")))?;
        info!(path = %self.path.display(), customers = tokens.len(), "Token file loaded");
        Ok(tokens)
    }

    async fn save(&self, tokens: &TokenMap) -> Result<(), TokenStoreError> {
        let plaintext = serde_json::to_vec(tokens)
            .map_err(|e| TokenStoreError::Corrupted(format!("token map: {e}")))?;

        let mut service = self.service.lock().await;
        if service.is_none() {
            *service = Some(self.derive(None).await?);
        }
        let sealed = service
            .as_ref()
            .ok_or_else(|| TokenStoreError::Io("encryption key unavailable".to_string()))?
            .encrypt_to_string(&plaintext)
            .map_err(map_crypto_error)?;

        self.write_atomically(&sealed).await?;
        debug!(path = %self.path.display(), customers = tokens.len(), "Token file saved");
        Ok(())
    }
}

fn map_crypto_error(err: CommonError) -> TokenStoreError {
    if err.is_decryption() {
        TokenStoreError::Decryption(err.to_string())
    } else if err.is_serialization() {
        TokenStoreError::Corrupted(err.to_string())
    } else {
        TokenStoreError::Io(err.to_string())
    }
}

fn io_error(err: std::io::Error) -> TokenStoreError {
    TokenStoreError::Io(err.to_string())
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), TokenStoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await.map_err(io_error)
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), TokenStoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;
    use tochka_domain::{CustomerTokens, TokenKind, TokenSlot};

    use super::*;

    fn sample_map() -> TokenMap {
        let mut tokens = CustomerTokens::default();
        tokens.set(TokenKind::Access, TokenSlot::issue("access", Duration::from_secs(3600), Duration::ZERO));
        tokens.set(TokenKind::Refresh, TokenSlot::issue("refresh", Duration::from_secs(86_400), Duration::ZERO));
        let mut map = TokenMap::new();
        map.insert("300000092".to_string(), tokens);
        map
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = EncryptedFileTokenStore::new(dir.path().join("tokens.json"), "app-id");

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_dirs_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/client/tokens.json");
        let map = sample_map();

        EncryptedFileTokenStore::new(&path, "app-id").save(&map).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("access"));
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = EncryptedFileTokenStore::new(&path, "app-id");
        assert_eq!(reopened.load().await.unwrap(), map);
    }

    #[tokio::test]
    async fn test_wrong_passphrase_is_decryption_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        EncryptedFileTokenStore::new(&path, "app-id").save(&sample_map()).await.unwrap();

        let err = EncryptedFileTokenStore::new(&path, "other").load().await.unwrap_err();

        assert!(matches!(err, TokenStoreError::Decryption(_)));
    }

    #[tokio::test]
    async fn test_garbage_file_is_corrupted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not base64 at all!").unwrap();

        let err = EncryptedFileTokenStore::new(&path, "app-id").load().await.unwrap_err();
        assert!(matches!(err, TokenStoreError::Corrupted(_)));

        std::fs::write(&path, "").unwrap();
        let err = EncryptedFileTokenStore::new(&path, "app-id").load().await.unwrap_err();
        assert!(matches!(err, TokenStoreError::Corrupted(_)));
    }

    #[test]
    fn test_default_path_is_per_client() {
        let (Some(a), Some(b)) = (default_tokens_path("app-a"), default_tokens_path("app-b")) else {
            return;
        };
        assert_ne!(a, b);
        assert!(a.ends_with(TOKENS_FILE_NAME));
        assert_eq!(a.parent().unwrap().file_name().unwrap().len(), 16);
    }
}
