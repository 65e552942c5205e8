use chrono::NaiveDate;
use tochka_domain::{Refund, RefundRequest, SbpPayment, SbpPaymentList};
use tracing::info;

use super::{date_param, segment, SBP};
use crate::api::client::ApiRequest;
use crate::api::customer::CustomerApi;
use crate::api::errors::ApiError;

impl CustomerApi<'_> {
    /// SBP payments received by `customer_code` between two dates.
    pub async fn get_payments(
        &self,
        customer_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SbpPayment>, ApiError> {
        let request = ApiRequest::get(format!("{SBP}/get-payments"))
            .query("customerCode", customer_code)
            .query("fromDate", date_param(from))
            .query("toDate", date_param(to));

        let list: SbpPaymentList = self.send(request).await?;
        Ok(list.payments)
    }

    /// Start refunding an SBP payment. Sent exactly once.
    pub async fn start_refund(&self, request: &RefundRequest) -> Result<Refund, ApiError> {
        let refund: Refund =
            self.send(ApiRequest::post(format!("{SBP}/refund")).json(request)?).await?;
        info!(request_id = %refund.request_id, qrc_id = %request.qrc_id, "Refund started");
        Ok(refund)
    }

    pub async fn get_refund(&self, request_id: &str) -> Result<Refund, ApiError> {
        self.send(ApiRequest::get(format!("{SBP}/refund/{}", segment(request_id)))).await
    }
}
