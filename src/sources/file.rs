//! File credential source.
//!
//! Reads an SDK auth file, the JSON document written by
//! `az ad sp create-for-rbac --sdk-auth`, and exchanges the service principal
//! it describes for a token. The file names its own identity endpoint, so a
//! file minted for a national cloud works without any other configuration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::authorizer::{AuthorizerHandle, BearerAuthorizer};
use crate::defaults;
use crate::environment::non_empty_var;
use crate::error::{AuthError, SourceError};
use crate::sources::CredentialSource;
use crate::token::{self, ClientCredentials};

const SOURCE_NAME: &str = "file";

/// Contents of an SDK auth file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFile {
    pub client_id: String,
    pub client_secret: secrecy::SecretString,
    pub tenant_id: String,
    #[serde(default)]
    pub subscription_id: Option<String>,
    pub active_directory_endpoint_url: String,
    #[serde(default)]
    pub resource_manager_endpoint_url: Option<String>,
}

impl AuthFile {
    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        serde_json::from_str(raw)
            .map_err(|e| AuthError::ParseError(format!("invalid auth file JSON: {e}")))
    }
}

/// Resolves credentials from an SDK auth file on disk.
pub struct FileCredentialSource {
    http: reqwest::blocking::Client,
    path: Option<PathBuf>,
}

impl FileCredentialSource {
    /// Creates a source that locates the auth file via `AZURE_AUTH_LOCATION`.
    pub fn new(http: reqwest::blocking::Client) -> Self {
        Self { http, path: None }
    }

    /// Pins the auth file to an explicit path instead of the variable.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn auth_file_path(&self) -> Result<PathBuf, SourceError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        non_empty_var(defaults::env::AUTH_LOCATION)
            .map(PathBuf::from)
            .ok_or_else(|| {
                SourceError::new(
                    SOURCE_NAME,
                    format!(
                        "no auth file path configured and {} is not set",
                        defaults::env::AUTH_LOCATION
                    ),
                )
            })
    }

    fn load(&self) -> Result<AuthFile, SourceError> {
        let path = self.auth_file_path()?;
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            SourceError::new(
                SOURCE_NAME,
                format!("failed to read auth file {}: {e}", path.display()),
            )
        })?;
        tracing::debug!(
            target: "azauth::source",
            path = %path.display(),
            "loaded auth file"
        );
        AuthFile::from_json(&raw).map_err(|e| SourceError::new(SOURCE_NAME, e.to_string()))
    }
}

impl CredentialSource for FileCredentialSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn resolve(&self, resource: &str) -> Result<AuthorizerHandle, SourceError> {
        let auth_file = self.load()?;
        let credentials = ClientCredentials {
            client_id: auth_file.client_id,
            client_secret: auth_file.client_secret,
            tenant_id: auth_file.tenant_id,
            active_directory_endpoint: auth_file.active_directory_endpoint_url,
        };
        let access_token = token::request_token(&self.http, &credentials, resource)
            .map_err(|e| SourceError::new(SOURCE_NAME, e.to_string()))?;
        Ok(Arc::new(BearerAuthorizer::from_access_token(
            access_token,
            resource,
            SOURCE_NAME,
        )))
    }
}
