//! Default values used across the crate.
//!
//! Centralizes every constant so the rest of the code never hard-codes
//! endpoints, variable names, or timeouts inline.

/// HTTP client defaults.
pub mod http {
    use std::time::Duration;

    /// Default timeout for a single identity-endpoint request.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Authentication defaults.
pub mod auth {
    /// Product tag appended to the user agent of every authorized client.
    pub const PRODUCT_TAG: &str = "azauth";

    /// Token type assumed when an identity endpoint omits one.
    pub const TOKEN_TYPE: &str = "Bearer";
}

/// Azure CLI defaults.
pub mod cli {
    /// Program invoked by the CLI credential source.
    pub const PROGRAM: &str = "az";
}

/// Environment variables consulted by this crate.
pub mod env {
    /// Selects the well-known cloud (`AzurePublicCloud`, `AzureChinaCloud`, ...).
    /// Unset or empty means the public cloud.
    pub const ENVIRONMENT: &str = "AZURE_ENVIRONMENT";

    /// Path to an SDK auth file written by `az ad sp create-for-rbac --sdk-auth`.
    pub const AUTH_LOCATION: &str = "AZURE_AUTH_LOCATION";

    /// Service principal client id.
    pub const CLIENT_ID: &str = "AZURE_CLIENT_ID";

    /// Service principal client secret.
    pub const CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";

    /// Tenant the service principal lives in.
    pub const TENANT_ID: &str = "AZURE_TENANT_ID";

    /// Default subscription, recorded in settings but not used for token requests.
    pub const SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";

    /// Client certificate path. Certificate credentials are detected so the
    /// failure reason is explicit, but they are not supported.
    pub const CLIENT_CERTIFICATE_PATH: &str = "AZURE_CLIENT_CERTIFICATE_PATH";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_reasonable() {
        assert!(http::CONNECT_TIMEOUT < http::REQUEST_TIMEOUT);
    }

    #[test]
    fn product_tag_is_stable() {
        assert_eq!(auth::PRODUCT_TAG, "azauth");
    }
}
