//! Per-customer OAuth token cache.

pub mod errors;
pub mod ports;
pub mod service;
