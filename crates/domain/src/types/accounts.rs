//! Open Banking accounts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::serde_helpers::OneOrMany;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Enabled,
    Disabled,
    Deleted,
    ProForma,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Business,
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountSubType {
    CreditCard,
    CurrentAccount,
    Loan,
    Mortgage,
    PrePaidCard,
    Savings,
    Special,
}

/// Account identification (number, BIC scheme, holder name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    #[serde(rename = "schemeName")]
    pub scheme: String,
    pub identification: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub customer_code: String,
    pub account_id: String,
    #[serde(default)]
    pub transit_account: Option<String>,
    pub status: AccountStatus,
    #[serde(rename = "statusUpdateDateTime", deserialize_with = "super::serde_helpers::bank_datetime")]
    pub status_updated_at: DateTime<Utc>,
    pub currency: String,
    pub account_type: AccountType,
    pub account_sub_type: AccountSubType,
    #[serde(rename = "registrationDate")]
    pub registered_at: NaiveDate,
    #[serde(default)]
    pub account_details: Vec<AccountDetails>,
}

impl Account {
    /// First entry of `accountDetails`, which carries the account number.
    pub fn details(&self) -> Option<&AccountDetails> {
        self.account_details.first()
    }
}

/// `Data` of the accounts endpoints: either `{"Account": [..]}` or a bare
/// account object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountList {
    pub accounts: Vec<Account>,
}

impl<'de> Deserialize<'de> for AccountList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Wrapped {
                #[serde(rename = "Account")]
                account: OneOrMany<Account>,
            },
            Single(Box<Account>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Wrapped { account } => Self { accounts: account.into_vec() },
            Raw::Single(account) => Self { accounts: vec![*account] },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "customerCode": "300000092",
            "accountId": id,
            "transitAccount": "40702810840020000001",
            "status": "Enabled",
            "statusUpdateDateTime": "2020-06-30T07:23:53.464+00:00",
            "currency": "RUB",
            "accountType": "Business",
            "accountSubType": "CurrentAccount",
            "registrationDate": "2020-06-30",
            "accountDetails": [{
                "schemeName": "RU.CBR.PAN",
                "identification": "40702810840020000001",
                "name": "ООО Ромашка"
            }]
        })
    }

    #[test]
    fn wrapped_list_is_parsed() {
        let data = serde_json::json!({"Account": [account_json("a/1"), account_json("a/2")]});
        let list: AccountList = serde_json::from_value(data).unwrap();

        assert_eq!(list.accounts.len(), 2);
        assert_eq!(list.accounts[1].account_id, "a/2");
        assert_eq!(list.accounts[0].account_sub_type, AccountSubType::CurrentAccount);
        assert_eq!(list.accounts[0].details().unwrap().scheme, "RU.CBR.PAN");
    }

    #[test]
    fn bare_account_becomes_single_item_list() {
        let list: AccountList = serde_json::from_value(account_json("solo")).unwrap();

        assert_eq!(list.accounts.len(), 1);
        assert_eq!(list.accounts[0].registered_at, NaiveDate::from_ymd_opt(2020, 6, 30).unwrap());
    }
}
