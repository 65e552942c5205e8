use chrono::NaiveDate;
use tochka_domain::{
    BooleanResponse, QrCode, QrCodeList, QrCodeRequest, QrPaymentData, QrPaymentStatus,
    QrPaymentStatusList, RegisteredQrCode, SbpStatus, StatusUpdate,
};

use super::{date_param, segment, SBP};
use crate::api::client::ApiRequest;
use crate::api::customer::CustomerApi;
use crate::api::errors::ApiError;

impl CustomerApi<'_> {
    /// QR codes issued for a legal entity.
    pub async fn get_qr_codes(&self, legal_id: &str) -> Result<Vec<QrCode>, ApiError> {
        let path = format!("{SBP}/qr-code/legal-entity/{}", segment(legal_id));
        let list: QrCodeList = self.send(ApiRequest::get(path)).await?;
        Ok(list.qr_codes)
    }

    /// One QR code; the bank answers with a one-element list.
    pub async fn get_qr_code(&self, qrc_id: &str) -> Result<Vec<QrCode>, ApiError> {
        let list: QrCodeList = self.send(ApiRequest::get(qr_path(qrc_id))).await?;
        Ok(list.qr_codes)
    }

    /// Issue a QR code for payments to `account_id` through `merchant_id`.
    pub async fn register_qr_code(
        &self,
        merchant_id: &str,
        account_id: &str,
        request: &QrCodeRequest,
    ) -> Result<RegisteredQrCode, ApiError> {
        let path =
            format!("{SBP}/qr-code/merchant/{}/{}", segment(merchant_id), segment(account_id));
        self.send(ApiRequest::post(path).json(request)?).await
    }

    pub async fn set_qr_code_status(&self, qrc_id: &str, status: SbpStatus) -> Result<bool, ApiError> {
        let request = ApiRequest::put(qr_path(qrc_id)).json(StatusUpdate { status })?;
        let response: BooleanResponse = self.send(request).await?;
        Ok(response.result)
    }

    pub async fn get_qr_payment_data(&self, qrc_id: &str) -> Result<QrPaymentData, ApiError> {
        self.send(ApiRequest::get(format!("{}/payment-data", qr_path(qrc_id)))).await
    }

    /// Payments made with a QR code, optionally limited to a date range.
    pub async fn get_qr_payment_status(
        &self,
        qrc_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<QrPaymentStatus>, ApiError> {
        let mut request = ApiRequest::get(format!("{}/payment-status", qr_path(qrc_id)));
        if let Some(from) = from {
            request = request.query("fromDate", date_param(from));
        }
        if let Some(to) = to {
            request = request.query("toDate", date_param(to));
        }

        let list: QrPaymentStatusList = self.send(request).await?;
        Ok(list.payments)
    }
}

fn qr_path(qrc_id: &str) -> String {
    format!("{SBP}/qr-code/{}", segment(qrc_id))
}
