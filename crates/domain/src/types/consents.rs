//! Consents created with the client-credentials token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permissions::Permission;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentStatus {
    AwaitingAuthorisation,
    Authorised,
    Rejected,
    Revoked,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentsResponse {
    pub status: ConsentStatus,
    #[serde(rename = "creationDateTime", deserialize_with = "super::serde_helpers::bank_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "statusUpdateDateTime", deserialize_with = "super::serde_helpers::bank_datetime")]
    pub updated_at: DateTime<Utc>,
    pub permissions: Vec<Permission>,
    #[serde(
        rename = "expirationDateTime",
        default,
        deserialize_with = "super::serde_helpers::opt_bank_datetime"
    )]
    pub expires_at: Option<DateTime<Utc>>,
    pub consent_id: String,
    #[serde(default)]
    pub customer_code: Option<String>,
    #[serde(default)]
    pub application_name: Option<String>,
    pub consumer_id: String,
    pub client_id: String,
}
