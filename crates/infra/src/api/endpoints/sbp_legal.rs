use serde::Serialize;
use tochka_domain::{
    BooleanResponse, RegisteredLegalEntity, SbpCustomerInfo, SbpLegalEntity, SbpStatus,
    StatusUpdate,
};

use super::{segment, SBP};
use crate::api::client::ApiRequest;
use crate::api::customer::CustomerApi;
use crate::api::errors::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegalEntityRegistration<'a> {
    customer_code: &'a str,
}

impl CustomerApi<'_> {
    /// SBP registration of a customer, with its merchants and accounts.
    pub async fn get_customer_info(&self, customer_code: &str) -> Result<SbpCustomerInfo, ApiError> {
        self.send(ApiRequest::get(format!("{SBP}/customer/{}", segment(customer_code)))).await
    }

    pub async fn get_legal_entity(&self, legal_id: &str) -> Result<SbpLegalEntity, ApiError> {
        self.send(ApiRequest::get(format!("{SBP}/legal-entity/{}", segment(legal_id)))).await
    }

    /// Activate or suspend a legal entity in SBP.
    pub async fn set_legal_entity_status(
        &self,
        legal_id: &str,
        status: SbpStatus,
    ) -> Result<bool, ApiError> {
        let request = ApiRequest::post(format!("{SBP}/legal-entity/{}", segment(legal_id)))
            .json(StatusUpdate { status })?;
        let response: BooleanResponse = self.send(request).await?;
        Ok(response.result)
    }

    /// Register the customer as a legal entity in SBP; returns its `legalId`.
    pub async fn register_legal_entity(
        &self,
        customer_code: &str,
    ) -> Result<RegisteredLegalEntity, ApiError> {
        let request = ApiRequest::post(format!("{SBP}/register-legal-entity"))
            .json(LegalEntityRegistration { customer_code })?;
        self.send(request).await
    }
}
