//! # Tochka Infrastructure
//!
//! Infrastructure implementations of the core token ports and the bank API
//! client.
//!
//! This crate contains:
//! - HTTP transport with bounded retry
//! - OAuth client and endpoint wrappers
//! - Token stores (memory, encrypted file)
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `tochka-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod token_store;

pub use api::{ApiError, CustomerApi, TochkaClient};
pub use http::HttpClient;
pub use token_store::{default_tokens_path, EncryptedFileTokenStore, MemoryTokenStore};
