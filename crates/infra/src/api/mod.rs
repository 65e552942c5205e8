//! Tochka Bank API client
//!
//! - [`TochkaClient`]: request helper, OAuth flows, customer selection
//! - [`CustomerApi`]: the endpoint wrappers, bound to one customer
//! - [`OAuthClient`]: token and introspection endpoints; it is also the
//!   [`TokenRefresher`](tochka_core::TokenRefresher) the token cache uses

pub mod client;
pub mod customer;
pub mod endpoints;
pub mod errors;
pub mod oauth;

pub use client::{ApiRequest, ConsentExpiration, CustomerIdentity, RequestAuth, TochkaClient};
pub use customer::CustomerApi;
pub use errors::{ApiError, ApiErrorCategory};
pub use oauth::{id_token_subject, AuthorizationOptions, OAuthClient};
