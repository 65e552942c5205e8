//! Domain types and models
//!
//! Response models mirror the JSON the bank returns inside the `Data`
//! member of its envelope. Request bodies serialize to the shape the bank
//! expects, including the `Data` wrapper.

pub mod accounts;
pub mod balances;
pub mod consents;
pub mod envelope;
pub mod permissions;
pub mod sbp;
pub mod sbp_qr;
pub mod sbp_refunds;
pub mod tokens;

mod serde_helpers;

pub use accounts::{Account, AccountDetails, AccountList, AccountStatus, AccountSubType, AccountType};
pub use balances::{AccountBalance, BalanceAmounts, BalanceList, CreditDebit};
pub use consents::{ConsentStatus, ConsentsResponse};
pub use envelope::{BooleanResponse, Envelope, RequestEnvelope};
pub use permissions::Permission;
pub use sbp::{
    MerchantCapabilities, MerchantRegistration, RegisteredLegalEntity, RegisteredMerchant,
    SbpAccount, SbpAccountList, SbpCustomerInfo, SbpLegalAddress, SbpLegalDetails,
    SbpLegalEntity, SbpMerchant, SbpMerchantList, SbpStatus, StatusUpdate,
};
pub use sbp_qr::{
    QrCode, QrCodeImage, QrCodeList, QrCodeRequest, QrCodeType, QrImageParams, QrPaymentData,
    QrPaymentStatus, QrPaymentStatusList, RegisteredQrCode,
};
pub use sbp_refunds::{PaymentStatus, Refund, RefundRequest, RefundStatus, SbpPayment, SbpPaymentList};
pub use tokens::{CustomerTokens, TokenGrant, TokenKind, TokenMap, TokenSlot};
