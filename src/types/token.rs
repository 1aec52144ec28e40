//! Token Types
//!
//! Salesforce OAuth2 token type definitions.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Token kind assumed when the endpoint omits `token_type`.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Lifetime assumed when the endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Raw token endpoint response.
///
/// Every field is optional at this layer; the token manager decides which
/// ones are required.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Identity URL, `https://<host>/id/<orgId>/<userId>`.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Remote issuance time in epoch milliseconds. Informational only.
    #[serde(default)]
    pub issued_at: Option<String>,
}

/// Accepts `3600`, `"3600"` or `null`.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::String(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}

/// Bearer credential for the Salesforce REST API.
///
/// A token always carries both an access token and the instance URL it is
/// valid for.
#[derive(Clone)]
pub struct Token {
    access_token: SecretString,
    instance_url: String,
    /// Token kind, usually `Bearer`.
    pub token_type: String,
    /// Nominal lifetime in seconds.
    pub expires_in: u64,
    /// Local clock value at acquisition.
    pub issued_at: DateTime<Utc>,
    refresh_token: Option<SecretString>,
    /// Granted scope.
    pub scope: Option<String>,
    /// Identity URL.
    pub id: Option<String>,
    /// Response signature.
    pub signature: Option<String>,
}

impl Token {
    /// Create a new token.
    pub fn new(
        access_token: impl Into<String>,
        instance_url: impl Into<String>,
        expires_in: u64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            expires_in,
            issued_at,
            refresh_token: None,
            scope: None,
            id: None,
            signature: None,
        }
    }

    /// Set the token kind.
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Set the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(SecretString::new(refresh_token.into()));
        self
    }

    /// Get token value (for Authorization header).
    pub fn secret(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Instance base URL, without a trailing slash.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Refresh token, when the endpoint issued one.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Nominal remote expiry, or `None` when the lifetime does not fit the
    /// calendar.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let lifetime_ms = self
            .expires_in
            .checked_mul(1000)
            .and_then(|ms| i64::try_from(ms).ok())?;
        self.issued_at
            .checked_add_signed(Duration::milliseconds(lifetime_ms))
    }

    /// Check whether the token must no longer be served at `now`.
    ///
    /// Expired once `now - issued_at >= expires_in - safety_margin`; a
    /// lifetime shorter than the margin is always expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, safety_margin: std::time::Duration) -> bool {
        let usable_ms = self
            .expires_in
            .saturating_sub(safety_margin.as_secs())
            .saturating_mul(1000);
        let elapsed_ms = (now - self.issued_at).num_milliseconds();
        elapsed_ms >= usable_ms.min(i64::MAX as u64) as i64
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.secret() == other.secret()
            && self.instance_url == other.instance_url
            && self.token_type == other.token_type
            && self.expires_in == other.expires_in
            && self.issued_at == other.issued_at
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("scope", &self.scope)
            .finish()
    }
}
