//! # Tochka Core
//!
//! Token lifecycle logic with no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for token persistence and refresh
//! - `TokenManager`, the per-customer token cache
//!
//! ## Architecture Principles
//! - Only depends on `tochka-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits

pub mod tokens;

pub use tokens::errors::{TokenError, TokenStoreError};
pub use tokens::ports::{TokenRefresher, TokenStore};
pub use tokens::service::TokenManager;
