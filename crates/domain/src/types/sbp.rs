//! SBP legal entities, their accounts and merchants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::serde_helpers::OneOrMany;

/// Activation state shared by every SBP object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SbpStatus {
    Active,
    Suspended,
}

impl SbpStatus {
    pub const fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Suspended
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Body of the status-changing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: SbpStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbpLegalAddress {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub country_code: String,
    #[serde(rename = "countrySubDivisionCode", default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbpLegalDetails {
    #[serde(default)]
    pub entity_type: Option<String>,
    pub inn: String,
    #[serde(default)]
    pub kpp: Option<String>,
    pub name: String,
    pub ogrn: String,
}

/// Which QR code types a merchant may issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MerchantCapabilities {
    #[serde(rename = "001")]
    StaticOnly,
    #[serde(rename = "010")]
    DynamicOnly,
    #[default]
    #[serde(rename = "011")]
    StaticAndDynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbpAccount {
    pub account_id: String,
    pub status: SbpStatus,
    #[serde(deserialize_with = "super::serde_helpers::bank_datetime")]
    pub created_at: DateTime<Utc>,
    pub legal_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbpMerchant {
    #[serde(flatten)]
    pub address: SbpLegalAddress,
    pub status: SbpStatus,
    #[serde(deserialize_with = "super::serde_helpers::bank_datetime")]
    pub created_at: DateTime<Utc>,
    pub legal_id: String,
    pub merchant_id: String,
    #[serde(rename = "brandName")]
    pub brand: String,
    pub capabilities: MerchantCapabilities,
    #[serde(rename = "contactPhoneNumber", default)]
    pub phone: Option<String>,
    pub mcc: String,
    #[serde(default)]
    pub additional_contacts: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbpLegalEntity {
    #[serde(flatten)]
    pub address: SbpLegalAddress,
    #[serde(flatten)]
    pub details: SbpLegalDetails,
    pub status: SbpStatus,
    #[serde(deserialize_with = "super::serde_helpers::bank_datetime")]
    pub created_at: DateTime<Utc>,
    pub customer_code: String,
    pub legal_id: String,
}

/// Legal entity together with its SBP accounts and merchants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbpCustomerInfo {
    #[serde(flatten)]
    pub address: SbpLegalAddress,
    #[serde(flatten)]
    pub details: SbpLegalDetails,
    pub status: SbpStatus,
    #[serde(deserialize_with = "super::serde_helpers::bank_datetime")]
    pub created_at: DateTime<Utc>,
    pub customer_code: String,
    pub legal_id: String,
    #[serde(rename = "MerchantList", default)]
    pub merchants: Vec<SbpMerchant>,
    #[serde(rename = "AccountList", default)]
    pub accounts: Vec<SbpAccount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredLegalEntity {
    pub legal_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredMerchant {
    pub merchant_id: String,
}

/// `Data` of the SBP account endpoints: `{"AccountList": [..]}` or one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbpAccountList {
    pub accounts: Vec<SbpAccount>,
}

impl<'de> Deserialize<'de> for SbpAccountList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Wrapped {
                #[serde(rename = "AccountList")]
                accounts: OneOrMany<SbpAccount>,
            },
            Single(SbpAccount),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Wrapped { accounts } => Self { accounts: accounts.into_vec() },
            Raw::Single(account) => Self { accounts: vec![account] },
        })
    }
}

/// `Data` of the merchant endpoints: `{"MerchantList": [..]}` or one merchant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbpMerchantList {
    pub merchants: Vec<SbpMerchant>,
}

impl<'de> Deserialize<'de> for SbpMerchantList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Wrapped {
                #[serde(rename = "MerchantList")]
                merchants: OneOrMany<SbpMerchant>,
            },
            Single(Box<SbpMerchant>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Wrapped { merchants } => Self { merchants: merchants.into_vec() },
            Raw::Single(merchant) => Self { merchants: vec![*merchant] },
        })
    }
}

/// Body of the merchant registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRegistration {
    pub address: String,
    pub city: String,
    pub country_code: String,
    #[serde(rename = "countrySubDivisionCode")]
    pub region_code: String,
    pub zip_code: String,
    #[serde(rename = "brandName")]
    pub brand: String,
    pub capabilities: MerchantCapabilities,
    pub mcc: String,
    #[serde(rename = "contactPhoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl MerchantRegistration {
    /// Registration in Russia that may issue both QR code types.
    pub fn new(
        brand: impl Into<String>,
        mcc: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        region_code: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            country_code: "RU".to_string(),
            region_code: region_code.into(),
            zip_code: zip_code.into(),
            brand: brand.into(),
            capabilities: MerchantCapabilities::default(),
            mcc: mcc.into(),
            phone: None,
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: MerchantCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "address": "ул. Ленина, 1",
            "city": "Москва",
            "countryCode": "RU",
            "countrySubDivisionCode": "45",
            "zipCode": "101000",
            "status": "Active",
            "createdAt": "2023-01-10T10:00:00+00:00",
            "legalId": "LF0000000001",
            "merchantId": id,
            "brandName": "Ромашка",
            "capabilities": "011",
            "contactPhoneNumber": "+79990000000",
            "mcc": "5812"
        })
    }

    #[test]
    fn customer_info_flattens_address_and_details() {
        let info: SbpCustomerInfo = serde_json::from_value(serde_json::json!({
            "address": "ул. Ленина, 1",
            "city": "Москва",
            "countryCode": "RU",
            "inn": "7700000000",
            "kpp": "770001001",
            "name": "ООО Ромашка",
            "ogrn": "1027700000000",
            "status": "Suspended",
            "createdAt": "2023-01-10T10:00:00+00:00",
            "customerCode": "300000092",
            "legalId": "LF0000000001",
            "MerchantList": [merchant_json("MF0000000001")],
            "AccountList": [{
                "accountId": "40702810840020000001",
                "status": "Active",
                "createdAt": "2023-01-10T10:00:00+00:00",
                "legalId": "LF0000000001"
            }]
        }))
        .unwrap();

        assert_eq!(info.details.inn, "7700000000");
        assert_eq!(info.address.city.as_deref(), Some("Москва"));
        assert!(!info.status.is_active());
        assert_eq!(info.merchants[0].capabilities, MerchantCapabilities::StaticAndDynamic);
        assert_eq!(info.accounts.len(), 1);
    }

    #[test]
    fn single_merchant_becomes_list() {
        let list: SbpMerchantList = serde_json::from_value(merchant_json("MF1")).unwrap();
        assert_eq!(list.merchants.len(), 1);
        assert_eq!(list.merchants[0].address.region_code.as_deref(), Some("45"));

        let wrapped: SbpMerchantList = serde_json::from_value(serde_json::json!({
            "MerchantList": [merchant_json("MF1"), merchant_json("MF2")]
        }))
        .unwrap();
        assert_eq!(wrapped.merchants[1].merchant_id, "MF2");
    }

    #[test]
    fn registration_omits_missing_phone() {
        let registration =
            MerchantRegistration::new("Ромашка", "5812", "ул. Ленина, 1", "Москва", "45", "101000");
        let body = serde_json::to_value(&registration).unwrap();

        assert_eq!(body["capabilities"], "011");
        assert_eq!(body["countrySubDivisionCode"], "45");
        assert!(body.get("contactPhoneNumber").is_none());

        let with_phone = serde_json::to_value(registration.with_phone("+7999")).unwrap();
        assert_eq!(with_phone["contactPhoneNumber"], "+7999");
    }
}
