//! Client-credentials token exchange against Azure Active Directory.
//!
//! Both the file and environment credential sources end in the same place: a
//! form POST to `{active_directory_endpoint}{tenant}/oauth2/token` asking for
//! a token scoped to one resource. This module owns that exchange and the
//! quirks of its response format.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::defaults;
use crate::error::AuthError;

/// Service principal credentials, however they were loaded.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub tenant_id: String,
    /// Identity endpoint to request tokens from, with trailing slash.
    pub active_directory_endpoint: String,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
        active_directory_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            tenant_id: tenant_id.into(),
            active_directory_endpoint: active_directory_endpoint.into(),
        }
    }
}

/// A token returned by an identity endpoint or the Azure CLI.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    /// Typically `Bearer`.
    pub token_type: String,
    /// When the token stops working, if the endpoint said.
    pub expires_on: Option<DateTime<Utc>>,
}

/// Wire shape of a v1 token response.
///
/// The v1 endpoint serializes its numeric fields as JSON strings
/// (`"expires_in": "3599"`), so those fields accept either form.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: SecretString,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_i64")]
    expires_in: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_flexible_i64")]
    expires_on: Option<i64>,
}

impl AccessToken {
    fn from_response(response: TokenResponse) -> Self {
        let expires_on = response
            .expires_on
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| {
                response
                    .expires_in
                    .map(|secs| Utc::now() + TimeDelta::seconds(secs))
            });
        Self {
            token: response.access_token,
            token_type: response
                .token_type
                .unwrap_or_else(|| defaults::auth::TOKEN_TYPE.to_string()),
            expires_on,
        }
    }
}

/// Token endpoint for a tenant: `{ad_endpoint}{tenant}/oauth2/token`.
pub(crate) fn token_endpoint(active_directory_endpoint: &str, tenant_id: &str) -> String {
    let base = active_directory_endpoint.trim_end_matches('/');
    format!("{base}/{tenant_id}/oauth2/token")
}

/// Requests a token for `resource` using the client-credentials grant.
pub fn request_token(
    http: &reqwest::blocking::Client,
    credentials: &ClientCredentials,
    resource: &str,
) -> Result<AccessToken, AuthError> {
    let endpoint = token_endpoint(&credentials.active_directory_endpoint, &credentials.tenant_id);
    tracing::debug!(
        target: "azauth::token",
        endpoint = %endpoint,
        client_id = %credentials.client_id,
        resource = %resource,
        "requesting token"
    );

    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.expose_secret()),
        ("resource", resource),
    ];

    let response = http
        .post(&endpoint)
        .form(&form)
        .send()
        .map_err(|e| AuthError::HttpError(format!("token request to {endpoint} failed: {e}")))?
        .error_for_status()
        .map_err(|e| AuthError::HttpError(format!("token endpoint rejected request: {e}")))?;

    let token_response: TokenResponse = response
        .json()
        .map_err(|e| AuthError::ParseError(format!("failed to decode token response: {e}")))?;

    Ok(AccessToken::from_response(token_response))
}

fn deserialize_flexible_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
