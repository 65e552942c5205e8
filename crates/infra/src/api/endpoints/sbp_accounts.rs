use tochka_domain::{BooleanResponse, SbpAccount, SbpAccountList, SbpStatus, StatusUpdate};

use super::{segment, SBP};
use crate::api::client::ApiRequest;
use crate::api::customer::CustomerApi;
use crate::api::errors::ApiError;

impl CustomerApi<'_> {
    /// Accounts of a legal entity registered in SBP.
    pub async fn get_sbp_accounts(&self, legal_id: &str) -> Result<Vec<SbpAccount>, ApiError> {
        let list: SbpAccountList =
            self.send(ApiRequest::get(format!("{SBP}/account/{}", segment(legal_id)))).await?;
        Ok(list.accounts)
    }

    pub async fn get_sbp_account(
        &self,
        legal_id: &str,
        account_id: &str,
    ) -> Result<Vec<SbpAccount>, ApiError> {
        let list: SbpAccountList =
            self.send(ApiRequest::get(account_path(legal_id, account_id))).await?;
        Ok(list.accounts)
    }

    /// Activate or suspend an account for SBP payments.
    pub async fn set_sbp_account_status(
        &self,
        legal_id: &str,
        account_id: &str,
        status: SbpStatus,
    ) -> Result<bool, ApiError> {
        let request = ApiRequest::put(account_path(legal_id, account_id)).json(StatusUpdate { status })?;
        let response: BooleanResponse = self.send(request).await?;
        Ok(response.result)
    }

    /// Enable SBP payments to an account.
    pub async fn register_sbp_account(&self, legal_id: &str, account_id: &str) -> Result<bool, ApiError> {
        let response: BooleanResponse =
            self.send(ApiRequest::post(account_path(legal_id, account_id))).await?;
        Ok(response.result)
    }
}

fn account_path(legal_id: &str, account_id: &str) -> String {
    format!("{SBP}/account/{}/{}", segment(legal_id), segment(account_id))
}
