//! Integration tests for token acquisition

use super::*;
use salesforce_integration::{AuthError, ConfigurationError, SalesforceError};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header};

#[tokio::test]
async fn test_client_credentials_exchange() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=test-client-id"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&mock_server, "tok-1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let tokens = client.token_manager();

    let first = tokens.get_access_token().await.unwrap();
    let second = tokens.get_access_token().await.unwrap();

    assert_eq!(first.secret(), "tok-1");
    assert_eq!(first.instance_url(), mock_server.uri());
    assert_eq!(first.token_type, "Bearer");
    assert_eq!(first.expires_in, 3600);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_password_grant_exchange() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=integration%40example.com"))
        .and(body_string_contains("password=pass%2BSECURITYTOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&mock_server, "tok-pw")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server)
        .username("integration@example.com")
        .password("pass+SECURITYTOKEN")
        .build()
        .unwrap();
    let client = SalesforceClient::new(config).unwrap();

    let token = client.token_manager().get_access_token().await.unwrap();
    assert_eq!(token.secret(), "tok-pw");
}

#[tokio::test]
async fn test_instance_url_derived_from_identity_url() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "id": format!("{}/id/00Dxx0000001gPL/005xx000001Sv6e", mock_server.uri()),
            "expires_in": "7200"
        })))
        .mount(&mock_server)
        .await;

    let token = client_for(&mock_server)
        .token_manager()
        .get_access_token()
        .await
        .unwrap();

    assert_eq!(token.instance_url(), mock_server.uri());
    assert_eq!(token.expires_in, 7200);
}

#[tokio::test]
async fn test_token_endpoint_rejection() {
    let mock_server = setup_mock_server().await;

    let error_body = json!({
        "error": "invalid_client",
        "error_description": "invalid client credentials"
    });

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .token_manager()
        .get_access_token()
        .await;

    match result {
        Err(SalesforceError::Auth(AuthError::TokenEndpoint { status, body })) => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid client credentials"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_secret_makes_no_request() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&mock_server, "tok")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = salesforce_config()
        .client_id("test-client-id")
        .token_url(format!("{}{}", mock_server.uri(), TOKEN_PATH))
        .build()
        .unwrap();
    let client = SalesforceClient::new(config).unwrap();

    let result = client.token_manager().get_access_token().await;
    assert!(matches!(
        result,
        Err(SalesforceError::Configuration(ConfigurationError::MissingField { ref field }))
            if field == "client_secret"
    ));
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body(&mock_server, "shared"))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let tokens = client.token_manager();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let tokens = tokens.clone();
            tokio::spawn(async move { tokens.get_access_token().await })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        let token = result.unwrap().unwrap();
        assert_eq!(token.secret(), "shared");
    }
}

#[tokio::test]
async fn test_refresh_and_health() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&mock_server, "tok-1")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&mock_server, "tok-2")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let report = client.health().await;
    assert!(report.connected);
    assert_eq!(
        client.token_manager().cached_token().await.unwrap().secret(),
        "tok-1"
    );

    let refreshed = client.refresh_token().await.unwrap();
    assert_eq!(refreshed.secret(), "tok-2");
}
