//! Configuration Builder
//!
//! Fluent builder for Salesforce configuration.

use secrecy::SecretString;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{ConfigurationError, SalesforceError, SalesforceResult};
use crate::types::{
    Credentials, SalesforceConfig, DEFAULT_API_VERSION, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
    DEFAULT_TOKEN_URL,
};

/// Salesforce configuration builder.
///
/// Missing credentials do not fail the build; they are reported per token
/// request instead.
pub struct SalesforceConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    username: Option<String>,
    password: Option<SecretString>,
    token_url: String,
    api_version: String,
    scope: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
    object_aliases: HashMap<String, String>,
    retrieval_fields: HashMap<String, Vec<String>>,
}

impl Default for SalesforceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesforceConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            scope: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: concat!("salesforce-integration/", env!("CARGO_PKG_VERSION")).to_string(),
            object_aliases: HashMap::new(),
            retrieval_fields: HashMap::new(),
        }
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set resource owner username. Together with a password this selects
    /// the password grant.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set resource owner password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set token endpoint.
    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Set REST API version, e.g. `v59.0`.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set requested scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Map an alias (matched case-insensitively) to a remote object type.
    pub fn object_alias(mut self, alias: impl Into<String>, object_type: impl Into<String>) -> Self {
        self.object_aliases
            .insert(alias.into().to_lowercase(), object_type.into());
        self
    }

    /// Set the fields selected when retrieving records of `object_type`.
    pub fn retrieval_fields<I, S>(mut self, object_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retrieval_fields.insert(
            object_type.into(),
            fields.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Build the Salesforce configuration.
    pub fn build(self) -> SalesforceResult<SalesforceConfig> {
        url::Url::parse(&self.token_url).map_err(|e| {
            SalesforceError::Configuration(ConfigurationError::InvalidValue {
                field: "token_url".to_string(),
                message: e.to_string(),
            })
        })?;

        if self.api_version.trim().is_empty() {
            return Err(SalesforceError::Configuration(
                ConfigurationError::InvalidValue {
                    field: "api_version".to_string(),
                    message: "must not be empty".to_string(),
                },
            ));
        }

        if self.timeout.is_zero() {
            return Err(SalesforceError::Configuration(
                ConfigurationError::InvalidValue {
                    field: "timeout".to_string(),
                    message: "must be greater than zero".to_string(),
                },
            ));
        }

        Ok(SalesforceConfig {
            credentials: Credentials {
                client_id: self.client_id.unwrap_or_default(),
                client_secret: self.client_secret,
                username: self.username,
                password: self.password,
            },
            token_url: self.token_url,
            api_version: self.api_version.trim().to_string(),
            scope: self.scope,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent,
            object_aliases: self.object_aliases,
            retrieval_fields: self.retrieval_fields,
        })
    }
}

impl SalesforceConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SalesforceConfigBuilder {
        SalesforceConfigBuilder::new()
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `SALESFORCE_CLIENT_ID`, `SALESFORCE_CLIENT_SECRET`,
    /// `SALESFORCE_USERNAME`, `SALESFORCE_PASSWORD`, `SALESFORCE_TOKEN_URL`,
    /// `SALESFORCE_API_VERSION`, `SALESFORCE_SCOPE` and
    /// `SALESFORCE_TIMEOUT_SECS`. Unset credentials are left empty.
    pub fn from_env() -> SalesforceResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> SalesforceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = SalesforceConfigBuilder::new();

        if let Some(client_id) = lookup("SALESFORCE_CLIENT_ID") {
            builder = builder.client_id(client_id);
        }

        if let Some(client_secret) = lookup("SALESFORCE_CLIENT_SECRET") {
            builder = builder.client_secret(client_secret);
        }

        if let Some(username) = lookup("SALESFORCE_USERNAME") {
            builder = builder.username(username);
        }

        if let Some(password) = lookup("SALESFORCE_PASSWORD") {
            builder = builder.password(password);
        }

        if let Some(token_url) = lookup("SALESFORCE_TOKEN_URL") {
            builder = builder.token_url(token_url);
        }

        if let Some(api_version) = lookup("SALESFORCE_API_VERSION") {
            builder = builder.api_version(api_version);
        }

        if let Some(scope) = lookup("SALESFORCE_SCOPE") {
            builder = builder.scope(scope);
        }

        if let Some(timeout_str) = lookup("SALESFORCE_TIMEOUT_SECS") {
            let timeout_secs = timeout_str.trim().parse::<u64>().map_err(|_| {
                SalesforceError::Configuration(ConfigurationError::InvalidValue {
                    field: "SALESFORCE_TIMEOUT_SECS".to_string(),
                    message: format!("not a number of seconds: {}", timeout_str),
                })
            })?;
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        builder.build()
    }
}

/// Create a new Salesforce configuration builder.
pub fn salesforce_config() -> SalesforceConfigBuilder {
    SalesforceConfigBuilder::new()
}
