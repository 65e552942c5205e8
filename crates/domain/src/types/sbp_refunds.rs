//! SBP payments and refunds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_REFUND_BANK_CODE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Confirming,
    Confirmed,
    Initiated,
    Accepting,
    Accepted,
    InProgress,
    Rejected,
    Error,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbpPayment {
    pub qrc_id: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "refTransactionId")]
    pub transaction_id: String,
}

/// `Data` of the payments lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SbpPaymentList {
    #[serde(rename = "Payments", default)]
    pub payments: Vec<SbpPayment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundStatus {
    Initiated,
    WaitingForConfirm,
    Confirmed,
    WaitingForAccept,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub request_id: String,
    pub status: RefundStatus,
    #[serde(rename = "statusDescription", default)]
    pub description: Option<String>,
}

/// Body of the refund endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub bank_code: String,
    #[serde(rename = "accountCode")]
    pub account: String,
    /// Rubles, sent as a string.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub qrc_id: String,
    #[serde(rename = "refTransactionId")]
    pub transaction_id: String,
}

impl RefundRequest {
    /// Refund in rubles through the default bank.
    pub fn new(
        account: impl Into<String>,
        amount: Decimal,
        qrc_id: impl Into<String>,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self {
            bank_code: DEFAULT_REFUND_BANK_CODE.to_string(),
            account: account.into(),
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            qrc_id: qrc_id.into(),
            transaction_id: transaction_id.into(),
        }
    }

    #[must_use]
    pub fn with_bank_code(mut self, bank_code: impl Into<String>) -> Self {
        self.bank_code = bank_code.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn refund_request_matches_bank_field_names() {
        let request = RefundRequest::new(
            "40702810840020000001",
            Decimal::from_str("150.50").unwrap(),
            "AS1000670LSS7DN18SJQDNP4B05KLJL2",
            "A2032101234567890000000011000001",
        );
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["bankCode"], "044525999");
        assert_eq!(body["accountCode"], "40702810840020000001");
        assert_eq!(body["amount"], "150.50");
        assert_eq!(body["currency"], "RUB");
        assert_eq!(body["refTransactionId"], "A2032101234567890000000011000001");
    }

    #[test]
    fn payments_list_parses_statuses() {
        let list: SbpPaymentList = serde_json::from_value(serde_json::json!({"Payments": [
            {"qrcId": "q1", "status": "Accepted", "message": "ok", "refTransactionId": "t1"},
            {"qrcId": "q2", "status": "InProgress", "refTransactionId": "t2"}
        ]}))
        .unwrap();

        assert_eq!(list.payments[0].status, PaymentStatus::Accepted);
        assert_eq!(list.payments[1].status, PaymentStatus::InProgress);
        assert_eq!(list.payments[1].message, "");
    }
}
