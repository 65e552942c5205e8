//! # Tochka Domain
//!
//! Domain types for the Tochka Open Banking and SBP API.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - OAuth token types
//! - Response and request models for every API group
//!
//! ## Architecture
//! - No dependencies on other Tochka crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
