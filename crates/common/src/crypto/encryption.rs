//! Cryptographic primitives for encrypting secrets at rest.
//!
//! - [`EncryptionService`]: AES-256-GCM encryption/decryption
//! - [`EncryptedData`]: Serializable encrypted data container
//! - Password-based key derivation using Argon2; the salt travels with the
//!   payload so the passphrase alone reopens it
//!
//! ## Usage
//!
//! ```rust
//! use tochka_common::crypto::encryption::EncryptionService;
//!
//! let key = EncryptionService::generate_key();
//! let service = EncryptionService::new(key)?;
//!
//! let plaintext = b"sensitive data";
//! let encrypted = service.encrypt(plaintext)?;
//! let decrypted = service.decrypt(&encrypted)?;
//! assert_eq!(decrypted, plaintext);
//! # Ok::<(), tochka_common::error::CommonError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::SaltString;
use argon2::Argon2;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

const ALGORITHM: &str = "AES-256-GCM";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Encrypted data container.
///
/// Every payload carries its own random nonce. Password-derived payloads also
/// carry the Argon2 salt so the key can be re-derived on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub salt: Option<String>,
    pub algorithm: String,
}

impl EncryptedData {
    /// Encode the payload as base64 of its JSON form.
    pub fn encode(&self) -> CommonResult<String> {
        let serialized = serde_json::to_vec(self)?;
        Ok(BASE64.encode(serialized))
    }

    /// Decode a payload produced by [`EncryptedData::encode`].
    ///
    /// Fails with [`CommonError::Serialization`] when the input is not valid
    /// base64 or does not contain a payload.
    pub fn decode(encoded: &str) -> CommonResult<Self> {
        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|e| CommonError::serialization_format("base64", e.to_string()))?;
        Ok(serde_json::from_slice(&decoded)?)
    }
}

/// AES-GCM encryption service with optional password-based key derivation.
pub struct EncryptionService {
    cipher: Aes256Gcm,
    password_salt: Option<String>,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("password_salt", &self.password_salt.is_some())
            .finish_non_exhaustive()
    }
}

impl EncryptionService {
    /// Create a new encryption service from a raw 32-byte key.
    pub fn new(key: Vec<u8>) -> CommonResult<Self> {
        if key.len() != KEY_LEN {
            return Err(CommonError::validation("key", "Encryption key must be exactly 32 bytes"));
        }

        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|e| {
            CommonError::internal(format!("Failed to create encryption cipher: {e}"))
        })?;

        Ok(Self { cipher, password_salt: None })
    }

    /// Derive an encryption key from a password with a fresh random salt.
    pub fn from_password(password: &str) -> CommonResult<Self> {
        Self::from_password_with_salt(password, None)
    }

    /// Derive an encryption key from a password and optional salt using Argon2.
    pub fn from_password_with_salt(password: &str, salt: Option<&str>) -> CommonResult<Self> {
        let salt = match salt {
            Some(existing) => SaltString::from_b64(existing)
                .map_err(|e| CommonError::serialization_format("salt", e.to_string()))?,
            None => SaltString::generate(OsRng),
        };

        let mut key = vec![0u8; KEY_LEN];
        Argon2::default()
            .hash_password_into(password.as_bytes(), salt.as_str().as_bytes(), &mut key)
            .map_err(|e| CommonError::internal(format!("Key derivation failed: {e}")))?;

        let mut service = Self::new(key)?;
        service.password_salt = Some(salt.to_string());
        Ok(service)
    }

    /// Re-derive the service that produced `encrypted` from `password`
    ///
    /// Fails with [`CommonError::Serialization`] when the payload carries no
    /// salt, i.e. was not produced by a password-derived service.
    pub fn for_payload(password: &str, encrypted: &EncryptedData) -> CommonResult<Self> {
        let salt = encrypted
            .salt
            .as_deref()
            .ok_or_else(|| CommonError::serialization("Encrypted payload is missing password salt"))?;
        Self::from_password_with_salt(password, Some(salt))
    }

    /// Generate a random 32-byte symmetric key.
    pub fn generate_key() -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    /// Salt the key was derived with, if it came from a password.
    pub fn password_salt(&self) -> Option<&str> {
        self.password_salt.as_deref()
    }

    /// Encrypt bytes into an `EncryptedData` payload.
    pub fn encrypt(&self, data: &[u8]) -> CommonResult<EncryptedData> {
        let nonce_bytes = Self::generate_nonce();
        let ciphertext = self
            .cipher
            .encrypt(&Nonce::from(nonce_bytes), data)
            .map_err(|e| CommonError::internal(format!("Encryption failed: {e}")))?;

        Ok(EncryptedData {
            nonce: nonce_bytes.to_vec(),
            ciphertext,
            salt: self.password_salt.clone(),
            algorithm: ALGORITHM.to_string(),
        })
    }

    /// Decrypt an [`EncryptedData`] payload back into raw bytes.
    ///
    /// A malformed payload is a [`CommonError::Serialization`]; a payload that
    /// does not authenticate under this key is a [`CommonError::Decryption`].
    pub fn decrypt(&self, encrypted: &EncryptedData) -> CommonResult<Vec<u8>> {
        if encrypted.algorithm != ALGORITHM {
            return Err(CommonError::serialization(format!(
                "Unsupported algorithm: {}",
                encrypted.algorithm
            )));
        }

        let nonce_array: [u8; NONCE_LEN] =
            encrypted.nonce.as_slice().try_into().map_err(|_| {
                CommonError::serialization("Nonce must be exactly 12 bytes for AES-256-GCM")
            })?;

        self.cipher
            .decrypt(&Nonce::from(nonce_array), encrypted.ciphertext.as_ref())
            .map_err(|_| CommonError::decryption("payload failed authentication"))
    }

    /// Encrypt bytes and encode the payload as a base64 string.
    pub fn encrypt_to_string(&self, data: &[u8]) -> CommonResult<String> {
        self.encrypt(data)?.encode()
    }

    fn generate_nonce() -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }
}
