//! Record Access Service
//!
//! Generic retrieval, creation, update and querying of remote records.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::core::{HttpMethod, HttpTransport};
use crate::error::{NotFoundError, ProtocolError, SalesforceError, SalesforceResult};
use crate::records::executor::RequestExecutor;
use crate::records::normalize::{normalize_record, QueryResponse};
use crate::soql::{build_retrieval_query, classify_identifier};
use crate::token::TokenManager;
use crate::types::{FieldMap, QueryResult, Record, SalesforceConfig};

/// Record access interface.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Retrieve one record using the configured field list for its type.
    async fn get_record_by_id(&self, object_type: &str, id: &str) -> SalesforceResult<Record>;

    /// Retrieve one record selecting `fields`. An empty list selects the
    /// configured fields for the type.
    async fn get_record_by_id_with_fields(
        &self,
        object_type: &str,
        id: &str,
        fields: &[String],
    ) -> SalesforceResult<Record>;

    /// Retrieve one record, inferring its type from the identifier prefix.
    async fn get_record(&self, id: &str) -> SalesforceResult<Record>;

    /// Create a record and return its remote identifier.
    async fn create_record(&self, object_type: &str, fields: FieldMap) -> SalesforceResult<String>;

    /// Apply `updates` and return the record as re-read afterwards.
    async fn update_record(
        &self,
        object_type: &str,
        id: &str,
        updates: FieldMap,
    ) -> SalesforceResult<Record>;

    /// Run a SOQL query and normalize every returned row.
    async fn execute_query(&self, soql: &str) -> SalesforceResult<QueryResult>;
}

/// Default record service implementation.
pub struct DefaultRecordService {
    executor: RequestExecutor,
}

impl DefaultRecordService {
    /// Create new record service.
    pub fn new(
        config: SalesforceConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            executor: RequestExecutor::new(config, transport, tokens),
        }
    }

    fn config(&self) -> &SalesforceConfig {
        self.executor.config()
    }

    fn query_path(&self, soql: &str) -> String {
        format!(
            "{}?q={}",
            self.config().data_path("query"),
            urlencoding::encode(soql)
        )
    }

    fn sobject_path(&self, object_type: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => self.config().data_path(&format!(
                "sobjects/{}/{}",
                object_type,
                urlencoding::encode(id)
            )),
            None => self.config().data_path(&format!("sobjects/{}", object_type)),
        }
    }

    async fn query(&self, soql: &str) -> SalesforceResult<QueryResponse> {
        let response = self
            .executor
            .execute(HttpMethod::Get, &self.query_path(soql), None)
            .await?;
        QueryResponse::parse(&response.body)
    }
}

#[async_trait]
impl RecordService for DefaultRecordService {
    async fn get_record_by_id(&self, object_type: &str, id: &str) -> SalesforceResult<Record> {
        self.get_record_by_id_with_fields(object_type, id, &[]).await
    }

    #[instrument(skip(self, fields))]
    async fn get_record_by_id_with_fields(
        &self,
        object_type: &str,
        id: &str,
        fields: &[String],
    ) -> SalesforceResult<Record> {
        let object_type = self.config().resolve_object_type(object_type);
        let fields = if fields.is_empty() {
            self.config().retrieval_fields_for(&object_type)
        } else {
            fields.to_vec()
        };

        let soql = build_retrieval_query(&object_type, id, fields.as_slice());
        debug!(soql = %soql, "Retrieving record");

        let response = self.query(&soql).await?;
        let row = response.records.first().ok_or_else(|| {
            SalesforceError::NotFound(NotFoundError {
                object_type: object_type.clone(),
                id: id.to_string(),
            })
        })?;

        normalize_record(&object_type, row)
    }

    async fn get_record(&self, id: &str) -> SalesforceResult<Record> {
        let object_type = classify_identifier(id);
        debug!(id, object_type, "Inferred object type");
        self.get_record_by_id(object_type, id).await
    }

    #[instrument(skip(self, fields))]
    async fn create_record(&self, object_type: &str, fields: FieldMap) -> SalesforceResult<String> {
        let object_type = self.config().resolve_object_type(object_type);
        let body = Value::Object(fields);

        let response = self
            .executor
            .execute_json(HttpMethod::Post, &self.sobject_path(&object_type, None), Some(&body))
            .await?;

        let id = response
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SalesforceError::Protocol(ProtocolError::MissingField {
                    field: "id".to_string(),
                })
            })?;

        info!(object_type = %object_type, id, "Created record");
        Ok(id.to_string())
    }

    #[instrument(skip(self, updates))]
    async fn update_record(
        &self,
        object_type: &str,
        id: &str,
        updates: FieldMap,
    ) -> SalesforceResult<Record> {
        let object_type = self.config().resolve_object_type(object_type);
        let body = Value::Object(updates);

        self.executor
            .execute(
                HttpMethod::Patch,
                &self.sobject_path(&object_type, Some(id)),
                Some(&body),
            )
            .await?;

        info!(object_type = %object_type, id, "Updated record");
        self.get_record_by_id(&object_type, id).await
    }

    #[instrument(skip(self))]
    async fn execute_query(&self, soql: &str) -> SalesforceResult<QueryResult> {
        self.query(soql).await?.into_query_result()
    }
}
