use tochka_domain::{Account, AccountList};

use super::{segment, OPEN_BANKING};
use crate::api::client::ApiRequest;
use crate::api::customer::CustomerApi;
use crate::api::errors::ApiError;

impl CustomerApi<'_> {
    /// Accounts the customer granted access to.
    pub async fn get_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let list: AccountList = self.send(ApiRequest::get(format!("{OPEN_BANKING}/accounts"))).await?;
        Ok(list.accounts)
    }

    /// One account; the bank answers with a one-element list.
    pub async fn get_account(&self, account_id: &str) -> Result<Vec<Account>, ApiError> {
        let path = format!("{OPEN_BANKING}/accounts/{}", segment(account_id));
        let list: AccountList = self.send(ApiRequest::get(path)).await?;
        Ok(list.accounts)
    }
}
