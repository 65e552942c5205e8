use tochka_domain::{
    BooleanResponse, MerchantRegistration, RegisteredMerchant, SbpMerchant, SbpMerchantList,
    SbpStatus, StatusUpdate,
};

use super::{segment, SBP};
use crate::api::client::ApiRequest;
use crate::api::customer::CustomerApi;
use crate::api::errors::ApiError;

impl CustomerApi<'_> {
    /// Merchants (points of sale) of a legal entity.
    pub async fn get_merchants(&self, legal_id: &str) -> Result<Vec<SbpMerchant>, ApiError> {
        let path = format!("{SBP}/merchant/legal-entity/{}", segment(legal_id));
        let list: SbpMerchantList = self.send(ApiRequest::get(path)).await?;
        Ok(list.merchants)
    }

    /// One merchant; the bank answers with a one-element list.
    pub async fn get_merchant(&self, merchant_id: &str) -> Result<Vec<SbpMerchant>, ApiError> {
        let list: SbpMerchantList =
            self.send(ApiRequest::get(format!("{SBP}/merchant/{}", segment(merchant_id)))).await?;
        Ok(list.merchants)
    }

    pub async fn register_merchant(
        &self,
        legal_id: &str,
        registration: &MerchantRegistration,
    ) -> Result<RegisteredMerchant, ApiError> {
        let request = ApiRequest::post(format!("{SBP}/merchant/legal-entity/{}", segment(legal_id)))
            .json(registration)?;
        self.send(request).await
    }

    pub async fn set_merchant_status(
        &self,
        merchant_id: &str,
        status: SbpStatus,
    ) -> Result<bool, ApiError> {
        let request = ApiRequest::put(format!("{SBP}/merchant/{}", segment(merchant_id)))
            .json(StatusUpdate { status })?;
        let response: BooleanResponse = self.send(request).await?;
        Ok(response.result)
    }
}
