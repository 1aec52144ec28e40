//! Integration tests using WireMock
//!
//! These tests run the client against a mock server standing in for both the
//! Salesforce token endpoint and the REST API, covering the full
//! request/response cycle over a real HTTP transport.

mod records;
mod token;
mod transport;

use salesforce_integration::{salesforce_config, SalesforceClient, SalesforceConfigBuilder};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/services/oauth2/token";
pub const QUERY_PATH: &str = "/services/data/v59.0/query";

/// Helper to start a mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Configuration builder pointed at the mock server's token endpoint.
pub fn config_for(server: &MockServer) -> SalesforceConfigBuilder {
    salesforce_config()
        .client_id("test-client-id")
        .client_secret("test-client-secret")
        .token_url(format!("{}{}", server.uri(), TOKEN_PATH))
}

/// Client with client-credentials configuration against the mock server.
pub fn client_for(server: &MockServer) -> SalesforceClient {
    SalesforceClient::new(config_for(server).build().unwrap()).unwrap()
}

/// Successful token endpoint body whose instance URL is the mock server.
pub fn token_body(server: &MockServer, access_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "instance_url": server.uri(),
        "id": format!("{}/id/00Dxx0000001gPL/005xx000001Sv6e", server.uri()),
        "token_type": "Bearer",
        "issued_at": "1700000000000",
        "signature": "c2lnbmF0dXJl"
    })
}

/// Mount a token endpoint that always issues `access_token`.
pub async fn mount_token(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(server, access_token)))
        .mount(server)
        .await;
}

/// Query response envelope.
pub fn query_body(records: serde_json::Value) -> serde_json::Value {
    let total = records.as_array().map(Vec::len).unwrap_or_default();
    json!({"totalSize": total, "done": true, "records": records})
}
