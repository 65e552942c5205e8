//! Endpoint wrappers against a mocked bank API.

mod support;

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use support::{client_with, config_for, envelope, live_tokens, single, CUSTOMER};
use tochka_core::TokenError;
use tochka_domain::{CustomerMode, QrCodeRequest, RefundRequest, SbpStatus};
use tochka_infra::ApiError;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn account(id: &str) -> serde_json::Value {
    serde_json::json!({
        "customerCode": CUSTOMER,
        "accountId": id,
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

#[tokio::test]
async fn accounts_are_listed_with_the_customer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uapi/open-banking/v1.0/accounts"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "Account": [account("40702810840020000001/044525999"), account("40702810840020000002/044525999")]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let accounts = client.api().get_accounts().await.unwrap();

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[1].account_id, "40702810840020000002/044525999");
}

#[tokio::test]
async fn single_account_is_encoded_into_the_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uapi/open-banking/v1.0/accounts/40702810840020000001%2F044525999"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(account("40702810840020000001/044525999"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Multi);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let accounts =
        client.customer(CUSTOMER).get_account("40702810840020000001/044525999").await.unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].customer_code, CUSTOMER);
}

#[tokio::test]
async fn balances_are_grouped_per_account() {
    let server = MockServer::start().await;
    let entry = |account: &str, kind: &str, amount: &str| {
        serde_json::json!({
            "accountId": account,
            "creditDebitIndicator": "Credit",
            "type": kind,
            "dateTime": "2023-01-10T10:00:00+03:00",
            "Amount": {"amount": amount.parse::<f64>().unwrap(), "currency": "RUB"}
        })
    };
    Mock::given(method("GET"))
        .and(path("/uapi/open-banking/v1.0/balances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "Balance": [
                entry("a/1", "OpeningAvailable", "100.5"),
                entry("a/1", "ClosingAvailable", "80"),
                entry("b/2", "ClosingAvailable", "12.25"),
            ]
        }))))
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let balances = client.api().get_balances().await.unwrap();

    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].amounts.opening_available, Some(Decimal::from_str("100.5").unwrap()));
    assert_eq!(balances[0].amounts.closing_available, Some(Decimal::from(80)));
    assert_eq!(balances[1].account_id, "b/2");
}

#[tokio::test]
async fn sbp_status_changes_send_the_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/uapi/sbp/v1.0/account/LF0000000001/40702810840020000001"))
        .and(body_json(serde_json::json!({"Data": {"status": "Suspended"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({"result": true}))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/uapi/sbp/v1.0/legal-entity/LF0000000001"))
        .and(body_json(serde_json::json!({"Data": {"status": "Active"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({"result": false}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;
    let api = client.api();

    let suspended = api
        .set_sbp_account_status("LF0000000001", "40702810840020000001", SbpStatus::Suspended)
        .await
        .unwrap();
    let activated =
        api.set_legal_entity_status("LF0000000001", SbpStatus::from_active(true)).await.unwrap();

    assert!(suspended);
    assert!(!activated);
}

#[tokio::test]
async fn qr_code_registration_posts_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uapi/sbp/v1.0/qr-code/merchant/MF0000000001/40702810840020000001"))
        .and(body_json(serde_json::json!({"Data": {
            "amount": 15000,
            "currency": "RUB",
            "paymentPurpose": "Заказ 42",
            "qrcType": "02",
            "imageParams": {"width": 300, "height": 300, "mediaType": "image/png"},
            "sourceName": "tochka-api-rs",
            "ttl": 10
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "qrcId": "AD10006M8KH1N0TA8RLPA3FJUKA3ARBK",
            "payload": "https://qr.nspk.ru/AD10006M8KH1N0TA8RLPA3FJUKA3ARBK"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let request = QrCodeRequest::dynamic(15000).with_purpose("Заказ 42").with_ttl(10);
    let registered = client
        .api()
        .register_qr_code("MF0000000001", "40702810840020000001", &request)
        .await
        .unwrap();

    assert_eq!(registered.qrc_id, "AD10006M8KH1N0TA8RLPA3FJUKA3ARBK");
    assert!(registered.image.is_none());
}

#[tokio::test]
async fn payments_are_filtered_by_customer_and_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uapi/sbp/v1.0/get-payments"))
        .and(query_param("customerCode", CUSTOMER))
        .and(query_param("fromDate", "2023-01-01"))
        .and(query_param("toDate", "2023-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "Payments": [{"qrcId": "q1", "status": "Accepted", "refTransactionId": "t1"}]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let payments = client
        .api()
        .get_payments(
            CUSTOMER,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].transaction_id, "t1");
}

#[tokio::test]
async fn refund_is_never_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uapi/sbp/v1.0/refund"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let request = RefundRequest::new(
        "40702810840020000001",
        Decimal::from_str("150.50").unwrap(),
        "AS1000670LSS7DN18SJQDNP4B05KLJL2",
        "A2032101234567890000000011000001",
    );
    let err = client.api().start_refund(&request).await.unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 503, .. }), "got {err:?}");
}

#[tokio::test]
async fn reads_are_retried_after_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uapi/sbp/v1.0/refund/req-1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/uapi/sbp/v1.0/refund/req-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "requestId": "req-1",
            "status": "Accepted"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let refund = client.api().get_refund("req-1").await.unwrap();

    assert_eq!(refund.request_id, "req-1");
}

#[tokio::test]
async fn overall_deadline_bounds_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uapi/open-banking/v1.0/accounts"))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "5"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, CustomerMode::Single);
    config.http.timeout_seconds = 1;
    config.http.max_attempts = 2;
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let err = client.api().get_accounts().await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout(deadline) if deadline == Duration::from_secs(3)), "got {err:?}");
}

#[tokio::test]
async fn multi_mode_requires_an_explicit_customer() {
    let server = MockServer::start().await;
    let config = config_for(&server, CustomerMode::Multi);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let err = client.api().get_accounts().await.unwrap_err();

    assert!(matches!(err, ApiError::Token(TokenError::NoCustomerSelected)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn unknown_customer_is_reported_before_any_request() {
    let server = MockServer::start().await;
    let config = config_for(&server, CustomerMode::Multi);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let err = client.customer("999").get_balances().await.unwrap_err();

    assert!(matches!(err, ApiError::Token(TokenError::UnknownCustomer(ref code)) if code == "999"));
    assert!(err.requires_authorization());
}

#[tokio::test]
async fn bank_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uapi/sbp/v1.0/merchant/MF1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": "404",
            "message": "Merchant not found"
        })))
        .mount(&server)
        .await;

    let config = config_for(&server, CustomerMode::Single);
    let (client, _) = client_with(&config, single(CUSTOMER, live_tokens("access-1"))).await;

    let err = client.api().get_merchant("MF1").await.unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Merchant not found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
