//! Construction-time configuration.
//!
//! [`AuthConfig`] replaces a variadic option list with a plain struct plus
//! `with_*` builders: every knob is visible, every default explicit, and a
//! config can be assembled field by field where that reads better.

use std::path::PathBuf;
use std::time::Duration;

use crate::defaults;
use crate::error::AuthError;

/// Settings for the HTTP client used to reach identity endpoints.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Overall request timeout.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Proxy URL, e.g. `http://proxy.example.com:8080`.
    pub proxy: Option<String>,
    /// Base user agent sent on every request.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            proxy: None,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds a blocking `reqwest` client from this configuration.
    pub fn build_blocking_client(&self) -> Result<reqwest::blocking::Client, AuthError> {
        let mut builder = reqwest::blocking::Client::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| AuthError::ConfigurationError(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder
            .build()
            .map_err(|e| AuthError::HttpError(format!("failed to build HTTP client: {e}")))
    }
}

/// Configuration for an [`Authenticator`](crate::Authenticator).
///
/// ```
/// use azauth::AuthConfig;
///
/// let config = AuthConfig::new().with_user_agent("mytool/1.4");
/// assert_eq!(config.user_agent, "mytool/1.4");
/// ```
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Product tag appended to the user agent of every client this
    /// authenticator authorizes. Defaults to `azauth`.
    pub user_agent: String,
    /// HTTP settings for token requests.
    pub http: HttpConfig,
    /// Explicit auth file path. When unset, the file source falls back to
    /// `AZURE_AUTH_LOCATION`.
    pub auth_file: Option<PathBuf>,
    /// Program invoked by the CLI source. Defaults to `az`.
    pub cli_program: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::auth::PRODUCT_TAG.to_string(),
            http: HttpConfig::default(),
            auth_file: None,
            cli_program: defaults::cli::PROGRAM.to_string(),
        }
    }
}

impl AuthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    pub fn with_auth_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_file = Some(path.into());
        self
    }

    pub fn with_cli_program(mut self, program: impl Into<String>) -> Self {
        self.cli_program = program.into();
        self
    }

    /// Checks the configuration for values that cannot work.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.user_agent.trim().is_empty() {
            return Err(AuthError::ConfigurationError(
                "user agent cannot be empty".to_string(),
            ));
        }
        if self.cli_program.trim().is_empty() {
            return Err(AuthError::ConfigurationError(
                "CLI program cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.user_agent, "azauth");
        assert_eq!(config.cli_program, "az");
        assert!(config.auth_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_override_defaults() {
        let config = AuthConfig::new()
            .with_user_agent("continuum/2.0")
            .with_auth_file("/tmp/my.auth")
            .with_cli_program("az.cmd");
        assert_eq!(config.user_agent, "continuum/2.0");
        assert_eq!(config.auth_file, Some(PathBuf::from("/tmp/my.auth")));
        assert_eq!(config.cli_program, "az.cmd");
    }

    #[test]
    fn empty_user_agent_fails_validation() {
        let config = AuthConfig::new().with_user_agent("  ");
        assert!(matches!(
            config.validate(),
            Err(AuthError::ConfigurationError(_))
        ));
    }

    #[test]
    fn http_config_builds_client() {
        let http = HttpConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("azauth-test");
        assert!(http.build_blocking_client().is_ok());
    }

    #[test]
    fn invalid_proxy_is_rejected() {
        let http = HttpConfig::new().with_proxy("not a url");
        assert!(matches!(
            http.build_blocking_client(),
            Err(AuthError::ConfigurationError(_))
        ));
    }
}
