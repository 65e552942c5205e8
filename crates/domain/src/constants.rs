//! API constants
//!
//! Endpoints, OAuth scopes and protocol defaults shared by every layer.

// Hosts
pub const DEFAULT_BASE_URL: &str = "https://enter.tochka.com/uapi";
pub const SANDBOX_BASE_URL: &str = "https://enter.tochka.com/sandbox/v2";
pub const DEFAULT_AUTH_URL: &str = "https://enter.tochka.com/connect";

// OAuth
pub const CLIENT_CREDENTIALS_SCOPE: &str =
    "accounts balances customers statements cards sbp payments special";
pub const AUTHORIZE_SCOPE: &str = "accounts cards customers sbp payments";
pub const REFRESH_SCOPE: &str = "accounts";
pub const DEFAULT_RESPONSE_TYPE: &str = "code id_token";
pub const REFRESH_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

// Transport
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_USER_AGENT: &str = concat!("tochka-api-rs/", env!("CARGO_PKG_VERSION"));

// Payments
pub const DEFAULT_CURRENCY: &str = "RUB";
pub const DEFAULT_REFUND_BANK_CODE: &str = "044525999";
pub const DEFAULT_QR_SOURCE_NAME: &str = "tochka-api-rs";
pub const DEFAULT_QR_IMAGE_SIZE: u32 = 300;
pub const DEFAULT_QR_MEDIA_TYPE: &str = "image/png";

// Token storage
pub const TOKENS_DIR_NAME: &str = "tochka-api";
pub const TOKENS_FILE_NAME: &str = "tokens.json";
