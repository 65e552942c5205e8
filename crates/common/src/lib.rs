//! Common primitives shared across the Tochka client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error primitives
//! - `runtime`: AES-256-GCM encryption with Argon2 key derivation

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod crypto;

#[cfg(feature = "runtime")]
pub use crypto::{EncryptedData, EncryptionService};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult};
