//! Credential Exchange
//!
//! Token request construction and token response interpretation.

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;

use crate::core::{HttpMethod, HttpRequest};
use crate::error::{AuthError, ConfigurationError, SalesforceError, SalesforceResult};
use crate::types::{
    GrantStrategy, SalesforceConfig, Token, TokenResponse, DEFAULT_EXPIRES_IN_SECS,
    DEFAULT_TOKEN_TYPE,
};

/// Check that every credential the selected grant needs is present.
pub fn validate_credentials(config: &SalesforceConfig) -> SalesforceResult<GrantStrategy> {
    let credentials = &config.credentials;

    if credentials.client_id.trim().is_empty() {
        return Err(missing("client_id"));
    }

    let has_secret = credentials
        .client_secret
        .as_ref()
        .is_some_and(|s| !s.expose_secret().is_empty());
    if !has_secret {
        return Err(missing("client_secret"));
    }

    if config.token_url.trim().is_empty() {
        return Err(missing("token_url"));
    }

    Ok(credentials.grant_strategy())
}

fn missing(field: &str) -> SalesforceError {
    SalesforceError::Configuration(ConfigurationError::MissingField {
        field: field.to_string(),
    })
}

/// Build the form-encoded token request for `grant`.
pub fn build_token_request(config: &SalesforceConfig, grant: GrantStrategy) -> HttpRequest {
    let credentials = &config.credentials;
    let client_secret = credentials
        .client_secret
        .as_ref()
        .map(|s| s.expose_secret().as_str())
        .unwrap_or_default();

    let mut params: Vec<(&str, &str)> = vec![
        ("grant_type", grant.as_str()),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", client_secret),
    ];

    if grant == GrantStrategy::Password {
        params.push(("username", credentials.username.as_deref().unwrap_or_default()));
        params.push((
            "password",
            credentials
                .password
                .as_ref()
                .map(|p| p.expose_secret().as_str())
                .unwrap_or_default(),
        ));
    }

    if let Some(scope) = config.scope.as_deref() {
        params.push(("scope", scope));
    }

    HttpRequest::new(HttpMethod::Post, config.token_url.as_str())
        .form(&params)
        .header("accept", "application/json")
        .timeout(config.timeout)
}

/// Interpret a successful token endpoint body.
pub fn parse_token_response(body: &str, issued_at: DateTime<Utc>) -> SalesforceResult<Token> {
    let response: TokenResponse = serde_json::from_str(body).map_err(|e| {
        SalesforceError::Auth(AuthError::InvalidResponse {
            message: e.to_string(),
        })
    })?;

    let access_token = response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(SalesforceError::Auth(AuthError::MissingAccessToken))?;

    let instance_url = response
        .instance_url
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| response.id.as_deref().and_then(derive_instance_url))
        .ok_or(SalesforceError::Auth(AuthError::MissingInstanceUrl))?;

    let mut token = Token::new(
        access_token,
        instance_url,
        response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        issued_at,
    )
    .with_token_type(
        response
            .token_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
    );

    if let Some(refresh_token) = response.refresh_token {
        token = token.with_refresh_token(refresh_token);
    }
    token.scope = response.scope;
    token.id = response.id;
    token.signature = response.signature;

    Ok(token)
}

/// Instance URL embedded in an identity URL: everything before `/id/`.
pub fn derive_instance_url(identity_url: &str) -> Option<String> {
    identity_url
        .find("/id/")
        .map(|idx| &identity_url[..idx])
        .filter(|base| !base.is_empty())
        .map(str::to_string)
}
