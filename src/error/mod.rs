//! Salesforce Error Types
//!
//! Error hierarchy for token acquisition and record access.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Root error type for the Salesforce integration.
#[derive(Error, Debug, Clone)]
pub enum SalesforceError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl SalesforceError {
    /// Get error code for telemetry and boundary payloads.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Protocol(_) => "PROTOCOL_ERROR",
        }
    }

    /// Check if a record call was rejected for authentication reasons (401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Remote(e) if e.is_auth_failure())
    }

    /// HTTP status a boundary layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) => 500,
            Self::NotFound(_) => 404,
            Self::Network(NetworkError::Timeout { .. }) => 504,
            Self::Auth(_) | Self::Remote(_) | Self::Network(_) | Self::Protocol(_) => 502,
        }
    }

    /// Translate into a structured failure payload.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.error_code().to_string(),
            message: self.to_string(),
            status: self.status_code(),
            remote_status: match self {
                Self::Remote(e) => Some(e.status),
                Self::Auth(AuthError::TokenEndpoint { status, .. }) => Some(*status),
                _ => None,
            },
        }
    }
}

/// Configuration error.
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Token endpoint error.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status. The body is
    /// kept verbatim for diagnostics.
    #[error("Token request failed with HTTP {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Unparseable token response: {message}")]
    InvalidResponse { message: String },

    #[error("Token response missing access_token")]
    MissingAccessToken,

    #[error("Token response missing instance_url and no usable id")]
    MissingInstanceUrl,
}

/// Non-success response from a record operation.
#[derive(Error, Debug, Clone)]
#[error("HTTP {status}: {body}")]
pub struct RemoteError {
    pub status: u16,
    pub body: String,
}

impl RemoteError {
    /// Create a remote error from a response status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 401 and 403 mean the access token was rejected.
    pub fn is_auth_failure(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Retrieval query returned zero rows.
#[derive(Error, Debug, Clone)]
#[error("{object_type} record {id} not found")]
pub struct NotFoundError {
    pub object_type: String,
    pub id: String,
}

/// Network/transport error.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Response parsing error.
#[derive(Error, Debug, Clone)]
pub enum ProtocolError {
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Missing field in response: {field}")]
    MissingField { field: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },
}

/// Result type for Salesforce operations.
pub type SalesforceResult<T> = Result<T, SalesforceError>;

/// Structured failure payload handed to the caller's boundary layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_status: Option<u16>,
}

/// Get user-friendly error message.
pub fn get_user_message(error: &SalesforceError) -> String {
    match error {
        SalesforceError::Configuration(_) => {
            "The Salesforce connection is not configured. Please contact an administrator."
                .to_string()
        }
        SalesforceError::Auth(_) => {
            "Could not sign in to Salesforce. Please check the integration credentials."
                .to_string()
        }
        SalesforceError::NotFound(e) => format!("The requested {} was not found.", e.object_type),
        SalesforceError::Network(NetworkError::Timeout { .. }) => {
            "Salesforce did not respond in time. Please try again.".to_string()
        }
        _ => "A Salesforce error occurred. Please try again.".to_string(),
    }
}
