//! Customer-scoped endpoint handle

use serde::de::DeserializeOwned;
use tochka_domain::CustomerTokens;

use super::client::{ApiRequest, RequestAuth, TochkaClient};
use super::errors::ApiError;

/// Endpoints executed with one customer's tokens
///
/// Obtained from [`TochkaClient::api`] (the active customer) or
/// [`TochkaClient::customer`] (an explicit customer code). The endpoint
/// methods live in [`crate::api::endpoints`].
#[derive(Debug, Clone)]
pub struct CustomerApi<'a> {
    client: &'a TochkaClient,
    customer: Option<String>,
}

impl<'a> CustomerApi<'a> {
    pub(crate) const fn new(client: &'a TochkaClient, customer: Option<String>) -> Self {
        Self { client, customer }
    }

    pub const fn client(&self) -> &'a TochkaClient {
        self.client
    }

    /// Customer code the requests run as
    ///
    /// # Errors
    /// [`ApiError::Token`] with `NoCustomerSelected` when no code was given and
    /// none is active.
    pub async fn customer_code(&self) -> Result<String, ApiError> {
        self.client.resolve_customer(self.customer.as_deref()).await
    }

    /// Snapshot of this customer's cached tokens.
    pub async fn tokens(&self) -> Result<CustomerTokens, ApiError> {
        let customer = self.customer_code().await?;
        Ok(self.client.tokens().get(&customer, false).await?)
    }

    /// Client-credentials token cached in this customer's `client` slot.
    pub async fn client_token(&self) -> Result<String, ApiError> {
        let customer = self.customer_code().await?;
        self.client.client_token_for(&customer).await
    }

    /// Whether the identity server still accepts this customer's access token.
    pub async fn introspect(&self) -> Result<bool, ApiError> {
        let customer = self.customer_code().await?;
        self.client.introspect_customer(&customer).await
    }

    /// Execute `request` with this customer's access token.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let customer = self.customer_code().await?;
        self.client.execute(request.auth(RequestAuth::Customer(customer))).await
    }
}
