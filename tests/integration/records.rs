//! Integration tests for record access

use super::*;
use salesforce_integration::{FieldMap, FieldValue, SalesforceError};
use wiremock::matchers::{body_json, header, query_param};

#[tokio::test]
async fn test_get_record_by_id() {
    let mock_server = setup_mock_server().await;
    mount_token(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param(
            "q",
            "SELECT Id, Name FROM Account WHERE Id = '001xx000003DGb2AAG' LIMIT 1",
        ))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_body(json!([{
            "attributes": {
                "type": "Account",
                "url": "/services/data/v59.0/sobjects/Account/001xx000003DGb2AAG"
            },
            "Id": "001xx000003DGb2AAG",
            "Name": "Acme",
            "AnnualRevenue": 1200.5,
            "IsDeleted": false,
            "Description": null
        }]))))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client
        .records()
        .get_record("001xx000003DGb2AAG")
        .await
        .unwrap();

    assert_eq!(record.object_type(), "Account");
    assert_eq!(record.len(), 4);
    assert_eq!(record.get_str("Name"), Some("Acme"));
    assert_eq!(record.get("AnnualRevenue"), Some(&FieldValue::Number(1200.5)));
    assert_eq!(record.get("IsDeleted"), Some(&FieldValue::Boolean(false)));
    assert!(record.get("Description").is_none());
    assert!(record.get("attributes").is_none());
}

#[tokio::test]
async fn test_zero_rows_is_not_found() {
    let mock_server = setup_mock_server().await;
    mount_token(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_body(json!([]))))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .records()
        .get_record_by_id("Contact", "003000000000000")
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, SalesforceError::NotFound(_)));
    assert_eq!(error.to_payload().status, 404);
}

#[tokio::test]
async fn test_create_update_round_trip() {
    let mock_server = setup_mock_server().await;
    mount_token(&mock_server, "tok").await;

    Mock::given(method("POST"))
        .and(path("/services/data/v59.0/sobjects/Account"))
        .and(body_json(json!({"Name": "New Co"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "001xx000003NEWAAA",
            "success": true,
            "errors": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/services/data/v59.0/sobjects/Account/001xx000003NEWAAA"))
        .and(body_json(json!({"Name": "Renamed Co", "Phone": "555-0100"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param(
            "q",
            "SELECT Id, Name FROM Account WHERE Id = '001xx000003NEWAAA' LIMIT 1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_body(json!([{
            "attributes": {"type": "Account"},
            "Id": "001xx000003NEWAAA",
            "Name": "Renamed Co"
        }]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = client_for(&mock_server).records();

    let mut fields = FieldMap::new();
    fields.insert("Name".to_string(), json!("New Co"));
    let id = records.create_record("Account", fields).await.unwrap();
    assert_eq!(id, "001xx000003NEWAAA");

    let mut updates = FieldMap::new();
    updates.insert("Name".to_string(), json!("Renamed Co"));
    updates.insert("Phone".to_string(), json!("555-0100"));
    let record = records
        .update_record("Account", &id, updates)
        .await
        .unwrap();

    assert_eq!(record.get_str("Name"), Some("Renamed Co"));
}

#[tokio::test]
async fn test_expired_session_is_retried_once() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&mock_server, "stale")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&mock_server, "fresh")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!([{
            "message": "Session expired or invalid",
            "errorCode": "INVALID_SESSION_ID"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_body(json!([{
            "Id": "006xx0000012345",
            "Name": "Big Deal"
        }]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = client_for(&mock_server)
        .records()
        .get_record("006xx0000012345")
        .await
        .unwrap();

    assert_eq!(record.object_type(), "Opportunity");
    assert_eq!(record.get_str("Name"), Some("Big Deal"));
}

#[tokio::test]
async fn test_persistent_auth_failure_is_surfaced() {
    let mock_server = setup_mock_server().await;
    mount_token(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!([{
            "errorCode": "INSUFFICIENT_ACCESS"
        }])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server)
        .records()
        .get_record_by_id("Account", "001xx")
        .await
        .unwrap_err();

    assert!(error.is_auth_failure());
    assert_eq!(error.to_payload().remote_status, Some(403));
}

#[tokio::test]
async fn test_execute_query_and_user_info() {
    let mock_server = setup_mock_server().await;
    mount_token(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("q", "SELECT Id, Name FROM Contact LIMIT 2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_body(json!([
            {"attributes": {"type": "Contact"}, "Id": "003a", "Name": "Ann"},
            {"attributes": {"type": "Contact"}, "Id": "003b", "Name": "Bob"}
        ]))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/oauth2/userinfo"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "preferred_username": "integration@example.com",
            "organization_id": "00Dxx0000001gPL"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let result = client
        .records()
        .execute_query("SELECT Id, Name FROM Contact LIMIT 2")
        .await
        .unwrap();
    assert_eq!(result.total_size, 2);
    assert_eq!(result.records[1].get_str("Name"), Some("Bob"));
    assert_eq!(result.records[1].object_type(), "Contact");

    let info = client.user_info().await.unwrap();
    assert_eq!(info["organization_id"], "00Dxx0000001gPL");
}
