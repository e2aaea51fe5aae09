//! Well-known Azure cloud environments and ambient settings.
//!
//! Every national cloud has its own identity and management endpoints, so
//! nothing in this crate hard-codes the public-cloud hosts. The active cloud
//! is selected once at construction from `AZURE_ENVIRONMENT` and threaded to
//! every credential source from there.

use crate::defaults;
use crate::error::AuthError;

/// Endpoints of one Azure cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Canonical cloud name, e.g. `AzurePublicCloud`.
    pub name: String,
    /// Identity endpoint, with trailing slash. Token requests go here.
    pub active_directory_endpoint: String,
    /// Management-plane endpoint, with trailing slash. Doubles as the
    /// default token resource when the caller does not name one.
    pub resource_manager_endpoint: String,
}

impl Environment {
    /// The worldwide public cloud.
    pub fn public() -> Self {
        Self {
            name: "AzurePublicCloud".into(),
            active_directory_endpoint: "https://login.microsoftonline.com/".into(),
            resource_manager_endpoint: "https://management.azure.com/".into(),
        }
    }

    /// The US government cloud.
    pub fn us_government() -> Self {
        Self {
            name: "AzureUSGovernmentCloud".into(),
            active_directory_endpoint: "https://login.microsoftonline.us/".into(),
            resource_manager_endpoint: "https://management.usgovcloudapi.net/".into(),
        }
    }

    /// The China cloud operated by 21Vianet.
    pub fn china() -> Self {
        Self {
            name: "AzureChinaCloud".into(),
            active_directory_endpoint: "https://login.chinacloudapi.cn/".into(),
            resource_manager_endpoint: "https://management.chinacloudapi.cn/".into(),
        }
    }

    /// The German sovereign cloud.
    pub fn german() -> Self {
        Self {
            name: "AzureGermanCloud".into(),
            active_directory_endpoint: "https://login.microsoftonline.de/".into(),
            resource_manager_endpoint: "https://management.microsoftazure.de/".into(),
        }
    }

    /// Looks up a cloud by name, case-insensitively.
    ///
    /// Accepts both the canonical names (`AzurePublicCloud`) and the short
    /// aliases the Azure CLI reports (`AzureCloud`, `AzureUSGovernment`).
    pub fn from_name(name: &str) -> Result<Self, AuthError> {
        match name.to_ascii_uppercase().as_str() {
            "AZUREPUBLICCLOUD" | "AZURECLOUD" => Ok(Self::public()),
            "AZUREUSGOVERNMENTCLOUD" | "AZUREUSGOVERNMENT" => Ok(Self::us_government()),
            "AZURECHINACLOUD" => Ok(Self::china()),
            "AZUREGERMANCLOUD" => Ok(Self::german()),
            _ => Err(AuthError::SettingsUnavailable(format!(
                "unknown cloud environment '{name}'"
            ))),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::public()
    }
}

/// Ambient settings captured once when an authenticator is constructed.
#[derive(Debug, Clone)]
pub struct EnvironmentSettings {
    /// The selected cloud.
    pub environment: Environment,
    /// `AZURE_TENANT_ID`, if set.
    pub tenant_id: Option<String>,
    /// `AZURE_SUBSCRIPTION_ID`, if set.
    pub subscription_id: Option<String>,
}

impl EnvironmentSettings {
    /// Reads settings from the process environment.
    ///
    /// An unset or empty `AZURE_ENVIRONMENT` selects the public cloud; a
    /// value that names no known cloud is a construction-time error.
    pub fn from_environment() -> Result<Self, AuthError> {
        let name = std::env::var(defaults::env::ENVIRONMENT).ok();
        Self::from_cloud_name(name.as_deref())
    }

    /// Builds settings for a named cloud, still reading the optional tenant
    /// and subscription variables from the process environment.
    pub fn from_cloud_name(cloud_name: Option<&str>) -> Result<Self, AuthError> {
        let environment = match cloud_name.map(str::trim) {
            None | Some("") => Environment::default(),
            Some(name) => Environment::from_name(name)?,
        };
        Ok(Self {
            environment,
            tenant_id: non_empty_var(defaults::env::TENANT_ID),
            subscription_id: non_empty_var(defaults::env::SUBSCRIPTION_ID),
        })
    }

    /// Builds settings around an explicit environment, ignoring the process
    /// environment entirely.
    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            tenant_id: None,
            subscription_id: None,
        }
    }
}

pub(crate) fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
