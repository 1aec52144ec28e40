//! Integration tests for transport limits

use super::*;
use salesforce_integration::{
    HttpMethod, HttpRequest, HttpTransport, NetworkError, ProtocolError, ReqwestHttpTransport,
    SalesforceError,
};
use std::time::Duration;

#[tokio::test]
async fn test_oversized_response_is_rejected() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(256)))
        .mount(&mock_server)
        .await;

    let transport = ReqwestHttpTransport::new()
        .unwrap()
        .with_max_response_size(64);

    let result = transport
        .send(HttpRequest::new(
            HttpMethod::Get,
            format!("{}/large", mock_server.uri()),
        ))
        .await;

    match result {
        Err(SalesforceError::Protocol(ProtocolError::ResponseTooLarge { size })) => {
            assert_eq!(size, 256);
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.status)),
    }
}

#[tokio::test]
async fn test_response_within_limit_is_returned() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/small"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&mock_server)
        .await;

    let transport = ReqwestHttpTransport::new()
        .unwrap()
        .with_max_response_size(64);

    let response = transport
        .send(HttpRequest::new(
            HttpMethod::Get,
            format!("{}/small", mock_server.uri()),
        ))
        .await
        .unwrap();

    assert_eq!(response.body.len(), 64);
}

#[tokio::test]
async fn test_stalled_token_endpoint_times_out() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body(&mock_server, "late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server)
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let client = SalesforceClient::new(config).unwrap();

    let error = client.token_manager().get_access_token().await.unwrap_err();

    assert!(matches!(
        error,
        SalesforceError::Network(NetworkError::Timeout { timeout }) if timeout == Duration::from_secs(1)
    ));
    assert_eq!(error.status_code(), 504);
}

#[tokio::test]
async fn test_stalled_record_call_times_out() {
    let mock_server = setup_mock_server().await;
    mount_token(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(query_body(json!([])))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server)
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let client = SalesforceClient::new(config).unwrap();

    let error = client
        .records()
        .get_record_by_id("Account", "001xx000003DGb2AAG")
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        SalesforceError::Network(NetworkError::Timeout { .. })
    ));
}
