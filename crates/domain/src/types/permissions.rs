//! Consent permissions.

use serde::{Deserialize, Serialize};

/// A permission a customer can grant in a consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ReadAccountsBasic,
    ReadAccountsDetail,
    ReadBalances,
    ReadStatements,
    ReadTransactionsBasic,
    ReadTransactionsDebits,
    ReadTransactionsCredits,
    ReadTransactionsDetail,
    ReadSpecialAccounts,
    ReadCustomerData,
    #[serde(rename = "ReadSBPData")]
    ReadSbpData,
    #[serde(rename = "EditSBPData")]
    EditSbpData,
    ReadCardData,
    EditCardData,
    EditCardState,
    ReadCardLimits,
    EditCardLimits,
    CreatePaymentForSign,
    CreatePaymentOrder,
}

impl Permission {
    const ALL: [Self; 19] = [
        Self::ReadAccountsBasic,
        Self::ReadAccountsDetail,
        Self::ReadBalances,
        Self::ReadStatements,
        Self::ReadTransactionsBasic,
        Self::ReadTransactionsDebits,
        Self::ReadTransactionsCredits,
        Self::ReadTransactionsDetail,
        Self::ReadSpecialAccounts,
        Self::ReadCustomerData,
        Self::ReadSbpData,
        Self::EditSbpData,
        Self::ReadCardData,
        Self::EditCardData,
        Self::EditCardState,
        Self::ReadCardLimits,
        Self::EditCardLimits,
        Self::CreatePaymentForSign,
        Self::CreatePaymentOrder,
    ];

    const ALL_READ: [Self; 13] = [
        Self::ReadAccountsBasic,
        Self::ReadAccountsDetail,
        Self::ReadBalances,
        Self::ReadStatements,
        Self::ReadTransactionsBasic,
        Self::ReadTransactionsDebits,
        Self::ReadTransactionsCredits,
        Self::ReadTransactionsDetail,
        Self::ReadSpecialAccounts,
        Self::ReadCustomerData,
        Self::ReadSbpData,
        Self::ReadCardData,
        Self::ReadCardLimits,
    ];

    /// Every permission.
    pub const fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Every read-only permission.
    pub const fn all_read() -> &'static [Self] {
        &Self::ALL_READ
    }
}
