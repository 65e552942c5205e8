//! SBP QR codes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sbp::SbpStatus;
use super::serde_helpers::opt_string_or_number;
use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_QR_IMAGE_SIZE, DEFAULT_QR_MEDIA_TYPE, DEFAULT_QR_SOURCE_NAME,
};

/// `qrcType`: "01" is a static code, "02" a dynamic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrCodeType {
    #[serde(rename = "01")]
    Static,
    #[serde(rename = "02")]
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeImage {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_media_type")]
    pub media_type: String,
    /// Base64 of the image, or SVG markup.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    pub account_id: String,
    pub status: SbpStatus,
    #[serde(deserialize_with = "super::serde_helpers::bank_datetime")]
    pub created_at: DateTime<Utc>,
    pub qrc_id: String,
    pub legal_id: String,
    pub merchant_id: String,
    /// Kopecks; absent for static codes without a fixed sum.
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(rename = "commissionPercent", default)]
    pub commission: Option<Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(rename = "paymentPurpose", default)]
    pub purpose: Option<String>,
    pub qrc_type: QrCodeType,
    #[serde(rename = "templateVersion", default)]
    pub version: Option<String>,
    pub payload: String,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub ttl: Option<String>,
    #[serde(default)]
    pub image: Option<QrCodeImage>,
}

/// `Data` of the QR code lookups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QrCodeList {
    #[serde(rename = "qrCodeList", default)]
    pub qr_codes: Vec<QrCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredQrCode {
    pub qrc_id: String,
    pub payload: String,
    #[serde(default)]
    pub image: Option<QrCodeImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrImageParams {
    pub width: u32,
    pub height: u32,
    pub media_type: String,
}

impl Default for QrImageParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_QR_IMAGE_SIZE,
            height: DEFAULT_QR_IMAGE_SIZE,
            media_type: DEFAULT_QR_MEDIA_TYPE.to_string(),
        }
    }
}

/// Body of the QR code registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    pub currency: String,
    pub payment_purpose: String,
    pub qrc_type: QrCodeType,
    pub image_params: QrImageParams,
    pub source_name: String,
    /// Minutes a dynamic code stays payable; 0 uses the bank default.
    pub ttl: u32,
}

impl QrCodeRequest {
    /// Static code without a fixed sum.
    pub fn static_code() -> Self {
        Self::new(QrCodeType::Static, None)
    }

    /// Dynamic code for `amount` kopecks.
    pub fn dynamic(amount: i64) -> Self {
        Self::new(QrCodeType::Dynamic, Some(amount))
    }

    fn new(qrc_type: QrCodeType, amount: Option<i64>) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            payment_purpose: String::new(),
            qrc_type,
            image_params: QrImageParams::default(),
            source_name: DEFAULT_QR_SOURCE_NAME.to_string(),
            ttl: 0,
        }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.payment_purpose = purpose.into();
        self
    }

    #[must_use]
    pub const fn with_ttl(mut self, minutes: u32) -> Self {
        self.ttl = minutes;
        self
    }

    #[must_use]
    pub fn with_image(mut self, image_params: QrImageParams) -> Self {
        self.image_params = image_params;
        self
    }
}

/// Payment details encoded in a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPaymentData {
    #[serde(default)]
    pub qrc_id: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_purpose: Option<String>,
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub legal_id: Option<String>,
    /// Fields without a typed counterpart.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPaymentStatus {
    pub qrc_id: String,
    #[serde(default)]
    pub code: Option<String>,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub trx_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QrPaymentStatusList {
    #[serde(rename = "paymentList", default)]
    pub payments: Vec<QrPaymentStatus>,
}

fn default_media_type() -> String {
    DEFAULT_QR_MEDIA_TYPE.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}
