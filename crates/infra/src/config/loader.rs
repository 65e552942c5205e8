//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credentials are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TOCHKA_CLIENT_ID`, `TOCHKA_CLIENT_SECRET`: OAuth credentials (required)
//! - `TOCHKA_BASE_URL`, `TOCHKA_AUTH_URL`: API and identity server roots
//! - `TOCHKA_SANDBOX`: use the sandbox API root when `TOCHKA_BASE_URL` is unset
//! - `TOCHKA_REDIRECT_URI`: redirect URI registered for the application
//! - `TOCHKA_CUSTOMER_MODE`: `single` or `multi`
//! - `TOCHKA_TOKEN_STORAGE`: `memory` or `encrypted_file`
//! - `TOCHKA_TOKENS_PATH`: token file location
//! - `TOCHKA_TOKENS_PASSPHRASE`: token file passphrase
//! - `TOCHKA_HTTP_TIMEOUT`: request timeout in seconds
//!
//! ## File Locations
//! The loader probes `tochka.{json,toml}` then `config.{json,toml}` in the
//! current directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tochka_domain::constants::SANDBOX_BASE_URL;
use tochka_domain::{Config, CustomerMode, Result, TochkaError, TokenStorage};

const FILE_NAMES: [&str; 4] = ["tochka.json", "tochka.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the credentials
/// are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TochkaError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `TochkaError::Config` if the credentials are missing or a value
/// does not parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::new(env_var("TOCHKA_CLIENT_ID")?, env_var("TOCHKA_CLIENT_SECRET")?);

    if let Some(base_url) = env_opt("TOCHKA_BASE_URL") {
        config.client.base_url = base_url;
    } else if env_bool("TOCHKA_SANDBOX", false) {
        config.client.base_url = SANDBOX_BASE_URL.to_string();
    }
    if let Some(auth_url) = env_opt("TOCHKA_AUTH_URL") {
        config.client.auth_url = auth_url;
    }
    config.client.redirect_uri = env_opt("TOCHKA_REDIRECT_URI");
    if let Some(mode) = env_parse::<CustomerMode>("TOCHKA_CUSTOMER_MODE")? {
        config.client.customer_mode = mode;
    }

    if let Some(storage) = env_parse::<TokenStorage>("TOCHKA_TOKEN_STORAGE")? {
        config.tokens.storage = storage;
    }
    config.tokens.path = env_opt("TOCHKA_TOKENS_PATH");
    config.tokens.passphrase = env_opt("TOCHKA_TOKENS_PASSPHRASE");

    if let Some(timeout) = env_parse::<u64>("TOCHKA_HTTP_TIMEOUT")? {
        config.http.timeout_seconds = timeout;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations with
/// [`probe_config_paths`]. The format is detected by file extension.
///
/// # Errors
/// Returns `TochkaError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TochkaError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TochkaError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TochkaError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TochkaError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TochkaError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TochkaError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Returns the first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| TochkaError::Config(format!("Missing required environment variable: {key}")))
}

/// Set and non-empty.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| TochkaError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
