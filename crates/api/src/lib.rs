//! # Tochka API
//!
//! Client for the Tochka Bank Open Banking and SBP API.
//!
//! This crate contains:
//! - [`TochkaContext`]: builds a ready client from configuration
//! - Re-exports of the client, models and errors of the lower layers
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the token store selected by configuration into the client
//!
//! ```no_run
//! # async fn run() -> tochka_api::Result<()> {
//! let context = tochka_api::TochkaContext::from_env().await?;
//! for account in context.api().get_accounts().await? {
//!     tracing::info!(account = %account.account_id, "account");
//! }
//! # Ok(())
//! # }
//! ```

pub mod context;

pub use context::TochkaContext;
pub use tochka_core::{TokenError, TokenManager, TokenRefresher, TokenStore, TokenStoreError};
pub use tochka_domain::types as models;
pub use tochka_domain::{Config, CustomerMode, Result, TochkaError, TokenStorage};
pub use tochka_infra::api::{
    ApiError, ApiErrorCategory, ApiRequest, AuthorizationOptions, ConsentExpiration,
    CustomerApi, CustomerIdentity, RequestAuth, TochkaClient,
};
pub use tochka_infra::observability::{init_json_tracing, init_tracing};
pub use tochka_infra::{config, EncryptedFileTokenStore, MemoryTokenStore};
