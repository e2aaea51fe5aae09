//! Authorizer abstraction and concrete implementations.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::error::AuthError;
use crate::token::AccessToken;

/// Supplies bearer tokens for one resource scope.
///
/// Implementations must be cheap to call repeatedly; anything expensive
/// belongs in the credential source that constructs the authorizer.
pub trait Authorizer: Send + Sync + fmt::Debug {
    /// Returns the bearer token to attach to a request.
    fn bearer_token(&self) -> Result<SecretString, AuthError>;

    /// The resource scope this authorizer was minted for.
    fn resource(&self) -> &str;

    /// Name of the credential source that produced this authorizer.
    fn source(&self) -> &'static str;
}

/// Shared handle to an authorizer, as stored in caches and clients.
pub type AuthorizerHandle = Arc<dyn Authorizer>;

/// An authorizer wrapping a token obtained from an identity endpoint.
#[derive(Clone)]
pub struct BearerAuthorizer {
    token: SecretString,
    resource: String,
    source: &'static str,
    expires_on: Option<DateTime<Utc>>,
}

impl BearerAuthorizer {
    pub fn new(
        token: impl Into<String>,
        resource: impl Into<String>,
        source: &'static str,
    ) -> Self {
        Self {
            token: SecretString::from(token.into()),
            resource: resource.into(),
            source,
            expires_on: None,
        }
    }

    pub(crate) fn from_access_token(
        token: AccessToken,
        resource: &str,
        source: &'static str,
    ) -> Self {
        Self {
            token: token.token,
            resource: resource.to_string(),
            source,
            expires_on: token.expires_on,
        }
    }

    /// Expiry reported by the identity endpoint, if any.
    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_on
    }
}

impl Authorizer for BearerAuthorizer {
    fn bearer_token(&self) -> Result<SecretString, AuthError> {
        Ok(self.token.clone())
    }

    fn resource(&self) -> &str {
        &self.resource
    }

    fn source(&self) -> &'static str {
        self.source
    }
}

impl fmt::Debug for BearerAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuthorizer")
            .field("resource", &self.resource)
            .field("source", &self.source)
            .field("expires_on", &self.expires_on)
            .finish_non_exhaustive()
    }
}

/// A fixed-token authorizer, mainly useful in tests and local tooling.
#[derive(Clone)]
pub struct StaticAuthorizer {
    token: SecretString,
    resource: String,
}

impl StaticAuthorizer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            resource: String::new(),
        }
    }

    pub fn for_resource(token: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            resource: resource.into(),
        }
    }
}

impl Authorizer for StaticAuthorizer {
    fn bearer_token(&self) -> Result<SecretString, AuthError> {
        Ok(self.token.clone())
    }

    fn resource(&self) -> &str {
        &self.resource
    }

    fn source(&self) -> &'static str {
        "static"
    }
}

impl fmt::Debug for StaticAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAuthorizer")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn bearer_authorizer_returns_its_token() {
        let authorizer = BearerAuthorizer::new("tok-123", "https://management.azure.com/", "file");
        let token = authorizer.bearer_token().unwrap();
        assert_eq!(token.expose_secret(), "tok-123");
        assert_eq!(authorizer.resource(), "https://management.azure.com/");
        assert_eq!(authorizer.source(), "file");
        assert!(authorizer.expires_on().is_none());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let authorizer = BearerAuthorizer::new("super-secret", "https://vault.azure.net/", "cli");
        let rendered = format!("{authorizer:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("vault.azure.net"));
    }

    #[test]
    fn static_authorizer_roundtrips_through_trait_object() {
        let handle: AuthorizerHandle = Arc::new(StaticAuthorizer::new("fixed"));
        assert_eq!(handle.bearer_token().unwrap().expose_secret(), "fixed");
        assert_eq!(handle.source(), "static");
    }
}
