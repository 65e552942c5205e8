//! [`TokenStore`](tochka_core::TokenStore) implementations
//!
//! - [`MemoryTokenStore`]: process-local, for tests and short-lived tools
//! - [`EncryptedFileTokenStore`]: AES-256-GCM encrypted JSON file

mod encrypted_file;
mod memory;

pub use encrypted_file::{default_tokens_path, EncryptedFileTokenStore};
pub use memory::MemoryTokenStore;
