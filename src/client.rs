//! Salesforce Client
//!
//! Wires configuration, transport, token cache, token manager and record
//! service into a single handle.

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::core::{Clock, HttpMethod, HttpTransport, ReqwestHttpTransport, SystemClock};
use crate::error::SalesforceResult;
use crate::records::{DefaultRecordService, RecordService, RequestExecutor};
use crate::token::{
    validate_credentials, DefaultTokenManager, InMemoryTokenCache, TokenManager,
    TokenManagerConfig,
};
use crate::types::{SalesforceConfig, Token};

/// Path of the OpenID Connect user info endpoint.
pub const USER_INFO_PATH: &str = "/services/oauth2/userinfo";

/// Salesforce client.
pub struct SalesforceClient {
    config: SalesforceConfig,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenManager>,
    records: Arc<dyn RecordService>,
    executor: RequestExecutor,
}

impl SalesforceClient {
    /// Create a client backed by a reqwest transport.
    pub fn new(config: SalesforceConfig) -> SalesforceResult<Self> {
        let transport = ReqwestHttpTransport::with_options(
            config.timeout,
            config.connect_timeout,
            &config.user_agent,
        )?;
        Ok(Self::with_components(
            config,
            Arc::new(transport),
            Arc::new(SystemClock),
        ))
    }

    /// Create a client from `SALESFORCE_*` environment variables.
    pub fn from_env() -> SalesforceResult<Self> {
        Self::new(SalesforceConfig::from_env()?)
    }

    /// Create a client over an explicit transport and clock.
    pub fn with_components(
        config: SalesforceConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens: Arc<dyn TokenManager> = Arc::new(DefaultTokenManager::with_clock(
            config.clone(),
            TokenManagerConfig::default(),
            transport.clone(),
            Arc::new(InMemoryTokenCache::new()),
            clock.clone(),
        ));
        let records: Arc<dyn RecordService> = Arc::new(DefaultRecordService::new(
            config.clone(),
            transport.clone(),
            tokens.clone(),
        ));
        let executor = RequestExecutor::new(config.clone(), transport, tokens.clone());

        Self {
            config,
            clock,
            tokens,
            records,
            executor,
        }
    }

    /// Record access service.
    pub fn records(&self) -> Arc<dyn RecordService> {
        self.records.clone()
    }

    /// Token manager shared by every record call.
    pub fn token_manager(&self) -> Arc<dyn TokenManager> {
        self.tokens.clone()
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &SalesforceConfig {
        &self.config
    }

    /// Discard the cached token and acquire a new one.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> SalesforceResult<Token> {
        self.tokens.invalidate().await;
        let token = self.tokens.get_access_token().await?;
        info!(instance_url = token.instance_url(), "Token refreshed on request");
        Ok(token)
    }

    /// Report whether a token can currently be obtained. Never fails.
    #[instrument(skip(self))]
    pub async fn health(&self) -> HealthReport {
        let (connected, error) = match self.tokens.get_access_token().await {
            Ok(_) => (true, None),
            Err(e) => {
                warn!(error = %e, "Health check could not obtain a token");
                (false, Some(e.to_string()))
            }
        };

        HealthReport {
            status: "UP",
            connected,
            error,
            checked_at: self.clock.now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Identity of the user the current token was issued to, as returned
    /// by the user info endpoint.
    #[instrument(skip(self))]
    pub async fn user_info(&self) -> SalesforceResult<serde_json::Value> {
        self.executor
            .execute_json(HttpMethod::Get, USER_INFO_PATH, None)
            .await
    }

    /// Configuration summary safe to display.
    pub fn config_diagnostics(&self) -> ConfigDiagnostics {
        let credentials = &self.config.credentials;

        ConfigDiagnostics {
            client_id: mask_secret(&credentials.client_id),
            client_secret: mask_secret(
                credentials
                    .client_secret
                    .as_ref()
                    .map(|s| s.expose_secret().as_str())
                    .unwrap_or_default(),
            ),
            username: credentials.username.clone(),
            password: credentials.password.as_ref().map(|_| "****"),
            token_url: self.config.token_url.clone(),
            api_version: self.config.api_version.clone(),
            grant: credentials.grant_strategy().as_str(),
            all_configured: validate_credentials(&self.config).is_ok(),
        }
    }
}

/// Connectivity report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    /// Always `UP`; connectivity is reported separately.
    pub status: &'static str,
    /// Whether a token could be obtained.
    pub connected: bool,
    /// Reason a token could not be obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
    pub version: &'static str,
}

/// Masked view of the connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDiagnostics {
    pub client_id: String,
    pub client_secret: String,
    pub username: Option<String>,
    /// `****` when a password is configured.
    pub password: Option<&'static str>,
    pub token_url: String,
    pub api_version: String,
    pub grant: &'static str,
    /// Whether the selected grant has every credential it needs.
    pub all_configured: bool,
}

/// Mask all but the first and last four characters. Values shorter than
/// eight characters are fully masked.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 8 {
        return "****".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
