//! Symmetric encryption used for secrets kept at rest.

pub mod encryption;

pub use encryption::{EncryptedData, EncryptionService};
