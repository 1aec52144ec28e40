//! Request executor with bearer auth and a one-shot token retry.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ProtocolError, RemoteError, SalesforceError, SalesforceResult};
use crate::token::TokenManager;
use crate::types::SalesforceConfig;

/// Executes REST calls against the instance a token was issued for.
///
/// A 401 or 403 answer invalidates the rejected token, unless another caller
/// already replaced it, and the call is repeated once with a freshly
/// acquired one. A second rejection is surfaced.
pub struct RequestExecutor {
    config: SalesforceConfig,
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenManager>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: SalesforceConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
        }
    }

    /// Configuration the executor was built with.
    pub fn config(&self) -> &SalesforceConfig {
        &self.config
    }

    /// Sends a request to `path` (relative to the instance URL) and returns
    /// the successful response.
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> SalesforceResult<HttpResponse> {
        let mut retried = false;

        loop {
            let token = self.tokens.get_access_token().await?;

            let mut request = HttpRequest::new(method, format!("{}{}", token.instance_url(), path))
                .header("authorization", token.authorization_header())
                .header("accept", "application/json")
                .timeout(self.config.timeout);
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(method = method.as_str(), path, "Sending record request");
            let response = self.transport.send(request).await?;

            if response.is_auth_failure() && !retried {
                warn!(
                    status = response.status,
                    path, "Record request rejected, reacquiring token"
                );
                self.tokens.invalidate_rejected(&token).await;
                retried = true;
                continue;
            }

            if !response.is_success() {
                return Err(SalesforceError::Remote(RemoteError::new(
                    response.status,
                    response.body,
                )));
            }

            return Ok(response);
        }
    }

    /// Sends a request and parses the response body as JSON. An empty body
    /// yields `Value::Null`.
    pub async fn execute_json(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> SalesforceResult<serde_json::Value> {
        let response = self.execute(method, path, body).await?;

        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&response.body).map_err(|e| {
            SalesforceError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })
    }
}
