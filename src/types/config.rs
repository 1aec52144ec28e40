//! Configuration Types
//!
//! Salesforce connection configuration types.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::time::Duration;

/// Default REST API version.
pub const DEFAULT_API_VERSION: &str = "v59.0";

/// Default login token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://login.salesforce.com/services/oauth2/token";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields retrieved when neither the caller nor the configuration names any.
pub const DEFAULT_RETRIEVAL_FIELDS: [&str; 2] = ["Id", "Name"];

/// Salesforce connection configuration.
#[derive(Clone)]
pub struct SalesforceConfig {
    /// Client credentials and optional resource-owner credentials.
    pub credentials: Credentials,
    /// OAuth2 token endpoint.
    pub token_url: String,
    /// REST API version, e.g. `v59.0`.
    pub api_version: String,
    /// Optional scope sent with the token request.
    pub scope: Option<String>,
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Object type aliases, keyed by lower-cased alias.
    pub object_aliases: HashMap<String, String>,
    /// Per object type retrieval field lists.
    pub retrieval_fields: HashMap<String, Vec<String>>,
}

impl SalesforceConfig {
    /// Resolve an object type name through the alias table.
    ///
    /// Unknown names are returned unchanged.
    pub fn resolve_object_type(&self, object_type: &str) -> String {
        self.object_aliases
            .get(&object_type.to_lowercase())
            .cloned()
            .unwrap_or_else(|| object_type.to_string())
    }

    /// Fields to select when retrieving a record of `object_type`.
    pub fn retrieval_fields_for(&self, object_type: &str) -> Vec<String> {
        match self.retrieval_fields.get(object_type) {
            Some(fields) if !fields.is_empty() => fields.clone(),
            _ => DEFAULT_RETRIEVAL_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Path of a REST data resource, relative to the instance URL.
    pub fn data_path(&self, resource: &str) -> String {
        format!(
            "/services/data/{}/{}",
            self.api_version,
            resource.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for SalesforceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceConfig")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url)
            .field("api_version", &self.api_version)
            .field("scope", &self.scope)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("object_aliases", &self.object_aliases)
            .finish()
    }
}

/// Credentials used at the token endpoint.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Connected app consumer key.
    pub client_id: String,
    /// Connected app consumer secret.
    pub client_secret: Option<SecretString>,
    /// Resource owner username (password grant only).
    pub username: Option<String>,
    /// Resource owner password, including any security token suffix.
    pub password: Option<SecretString>,
}

impl Credentials {
    /// Grant selected by this credential set.
    ///
    /// The password grant is used whenever both a username and a password are
    /// configured; otherwise the client credentials grant.
    pub fn grant_strategy(&self) -> GrantStrategy {
        let has_username = self.username.as_deref().is_some_and(|u| !u.is_empty());
        let has_password = self
            .password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty());

        if has_username && has_password {
            GrantStrategy::Password
        } else {
            GrantStrategy::ClientCredentials
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// OAuth2 grant used to obtain a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantStrategy {
    /// Resource owner password credentials grant.
    Password,
    /// Client credentials grant.
    ClientCredentials,
}

impl GrantStrategy {
    /// Value of the `grant_type` form parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
        }
    }
}
