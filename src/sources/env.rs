//! Environment-variable credential source.
//!
//! Builds service principal credentials from `AZURE_CLIENT_ID`,
//! `AZURE_CLIENT_SECRET` and `AZURE_TENANT_ID`, then exchanges them for a
//! token at the active cloud's identity endpoint. This is the last source in
//! the default chain.

use std::sync::Arc;

use crate::authorizer::{AuthorizerHandle, BearerAuthorizer};
use crate::defaults;
use crate::environment::{Environment, non_empty_var};
use crate::error::SourceError;
use crate::sources::CredentialSource;
use crate::token::{self, ClientCredentials};

const SOURCE_NAME: &str = "environment";

/// Resolves credentials from service principal environment variables.
pub struct EnvCredentialSource {
    http: reqwest::blocking::Client,
    environment: Environment,
    credentials: Option<ClientCredentials>,
}

impl EnvCredentialSource {
    pub fn new(environment: Environment, http: reqwest::blocking::Client) -> Self {
        Self {
            http,
            environment,
            credentials: None,
        }
    }

    /// Uses explicit credentials instead of reading process variables.
    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn gather(&self) -> Result<ClientCredentials, SourceError> {
        if let Some(credentials) = &self.credentials {
            return Ok(credentials.clone());
        }
        credentials_from_values(
            &self.environment,
            non_empty_var(defaults::env::CLIENT_ID),
            non_empty_var(defaults::env::CLIENT_SECRET),
            non_empty_var(defaults::env::TENANT_ID),
            non_empty_var(defaults::env::CLIENT_CERTIFICATE_PATH).is_some(),
        )
    }
}

impl CredentialSource for EnvCredentialSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn resolve(&self, resource: &str) -> Result<AuthorizerHandle, SourceError> {
        let credentials = self.gather()?;
        let access_token = token::request_token(&self.http, &credentials, resource)
            .map_err(|e| SourceError::new(SOURCE_NAME, e.to_string()))?;
        Ok(Arc::new(BearerAuthorizer::from_access_token(
            access_token,
            resource,
            SOURCE_NAME,
        )))
    }
}

fn credentials_from_values(
    environment: &Environment,
    client_id: Option<String>,
    client_secret: Option<String>,
    tenant_id: Option<String>,
    certificate_configured: bool,
) -> Result<ClientCredentials, SourceError> {
    match (client_id, client_secret, tenant_id) {
        (Some(client_id), Some(client_secret), Some(tenant_id)) => Ok(ClientCredentials::new(
            client_id,
            client_secret,
            tenant_id,
            environment.active_directory_endpoint.clone(),
        )),
        (client_id, client_secret, tenant_id) => {
            if certificate_configured {
                return Err(SourceError::new(
                    SOURCE_NAME,
                    format!(
                        "client certificate credentials ({}) are not supported",
                        defaults::env::CLIENT_CERTIFICATE_PATH
                    ),
                ));
            }
            let mut missing = Vec::new();
            if client_id.is_none() {
                missing.push(defaults::env::CLIENT_ID);
            }
            if client_secret.is_none() {
                missing.push(defaults::env::CLIENT_SECRET);
            }
            if tenant_id.is_none() {
                missing.push(defaults::env::TENANT_ID);
            }
            Err(SourceError::new(
                SOURCE_NAME,
                format!("missing environment variables: {}", missing.join(", ")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn complete_trio_builds_credentials() {
        let credentials = credentials_from_values(
            &Environment::public(),
            Some("client".into()),
            Some("secret".into()),
            Some("tenant".into()),
            false,
        )
        .unwrap();
        assert_eq!(credentials.client_id, "client");
        assert_eq!(credentials.client_secret.expose_secret(), "secret");
        assert_eq!(credentials.tenant_id, "tenant");
        assert_eq!(
            credentials.active_directory_endpoint,
            "https://login.microsoftonline.com/"
        );
    }

    #[test]
    fn endpoint_follows_the_environment() {
        let credentials = credentials_from_values(
            &Environment::china(),
            Some("client".into()),
            Some("secret".into()),
            Some("tenant".into()),
            false,
        )
        .unwrap();
        assert_eq!(
            credentials.active_directory_endpoint,
            "https://login.chinacloudapi.cn/"
        );
    }

    #[test]
    fn missing_variables_are_listed() {
        let err = credentials_from_values(
            &Environment::public(),
            Some("client".into()),
            None,
            None,
            false,
        )
        .unwrap_err();
        assert_eq!(err.source, "environment");
        assert!(err.reason.contains("AZURE_CLIENT_SECRET"));
        assert!(err.reason.contains("AZURE_TENANT_ID"));
        assert!(!err.reason.contains("AZURE_CLIENT_ID"));
    }

    #[test]
    fn explicit_credentials_bypass_process_variables() {
        let http = reqwest::blocking::Client::new();
        let credentials = ClientCredentials::new(
            "client",
            "secret",
            "tenant",
            "https://login.microsoftonline.com/",
        );
        let source =
            EnvCredentialSource::new(Environment::public(), http).with_credentials(credentials);
        let gathered = source.gather().unwrap();
        assert_eq!(gathered.client_id, "client");
        assert_eq!(gathered.tenant_id, "tenant");
    }

    #[test]
    fn certificate_only_setup_gets_a_specific_reason() {
        let err = credentials_from_values(
            &Environment::public(),
            Some("client".into()),
            None,
            Some("tenant".into()),
            true,
        )
        .unwrap_err();
        assert!(err.reason.contains("AZURE_CLIENT_CERTIFICATE_PATH"));
        assert!(err.reason.contains("not supported"));
    }
}
