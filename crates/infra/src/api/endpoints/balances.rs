use tochka_domain::{AccountBalance, BalanceList};

use super::{segment, OPEN_BANKING};
use crate::api::client::ApiRequest;
use crate::api::customer::CustomerApi;
use crate::api::errors::ApiError;

impl CustomerApi<'_> {
    /// Balances of every account, one entry per account.
    pub async fn get_balances(&self) -> Result<Vec<AccountBalance>, ApiError> {
        let list: BalanceList = self.send(ApiRequest::get(format!("{OPEN_BANKING}/balances"))).await?;
        Ok(list.balances)
    }

    /// Balance of one account.
    pub async fn get_balance(&self, account_id: &str) -> Result<Vec<AccountBalance>, ApiError> {
        let path = format!("{OPEN_BANKING}/accounts/{}/balances", segment(account_id));
        let list: BalanceList = self.send(ApiRequest::get(path)).await?;
        Ok(list.balances)
    }
}
