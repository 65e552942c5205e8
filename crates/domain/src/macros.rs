//! Macro for implementing Display and FromStr for setting enums
//!
//! Settings that arrive as plain strings (environment variables, CLI flags)
//! share one conversion shape: case-insensitive parsing and a stable
//! lowercase rendering.
//!
//! # Example
//!
//! ```rust
//! use tochka_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Environment {
//!     Production,
//!     Sandbox,
//! }
//!
//! impl_domain_status_conversions!(Environment {
//!     Production => "production",
//!     Sandbox => "sandbox",
//! });
//!
//! assert_eq!("SANDBOX".parse::<Environment>(), Ok(Environment::Sandbox));
//! ```

/// Implements Display and FromStr traits for setting enums
///
/// This macro generates:
/// - Display trait: converts enum variants to lowercase strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// The string for every variant must be lowercase.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
