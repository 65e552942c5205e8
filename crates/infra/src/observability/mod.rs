//! Logging setup
//!
//! The library only emits `tracing` events; binaries and tests call
//! [`init_tracing`] once to print them.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_filter` when
/// it is unset
///
/// Returns `false` when a global subscriber was already installed, so calling
/// it more than once is harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

/// Same as [`init_tracing`] with JSON lines output.
pub fn init_json_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        init_tracing("tochka_infra=debug");
        assert!(!init_tracing("info"));
        assert!(!init_json_tracing("info"));
    }
}
