//! A service client that carries an authorizer and a user agent.
//!
//! [`ResourceClient`] is the thing an [`Authenticator`](crate::Authenticator)
//! binds credentials onto: it owns an HTTP connection pool, an optional
//! authorizer, and the user-agent string identifying the calling tool.

use std::fmt;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;

use crate::authorizer::AuthorizerHandle;
use crate::config::HttpConfig;
use crate::error::AuthError;

/// HTTP client for one Azure service, with pluggable authorization.
#[derive(Clone)]
pub struct ResourceClient {
    http: reqwest::blocking::Client,
    user_agent: String,
    authorizer: Option<AuthorizerHandle>,
}

impl ResourceClient {
    /// Builds a client from HTTP settings. The configured user agent, if
    /// any, becomes the client's base identification string.
    pub fn new(config: &HttpConfig) -> Result<Self, AuthError> {
        let http = config.build_blocking_client()?;
        Ok(Self {
            http,
            user_agent: config.user_agent.clone().unwrap_or_default(),
            authorizer: None,
        })
    }

    /// Wraps an existing `reqwest` client, sharing its connection pool.
    pub fn from_client(http: reqwest::blocking::Client) -> Self {
        Self {
            http,
            user_agent: String::new(),
            authorizer: None,
        }
    }

    /// Replaces the base identification string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The current identification string, product tags separated by spaces.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The authorizer attached to this client, if any.
    pub fn authorizer(&self) -> Option<&AuthorizerHandle> {
        self.authorizer.as_ref()
    }

    /// Attaches an authorizer. Replaces any previous one.
    pub fn set_authorizer(&mut self, authorizer: AuthorizerHandle) {
        self.authorizer = Some(authorizer);
    }

    /// Appends a product tag to the identification string.
    ///
    /// Appending is not idempotent; callers add each tag once.
    pub fn add_to_user_agent(&mut self, tag: &str) {
        if self.user_agent.is_empty() {
            self.user_agent = tag.to_string();
        } else {
            self.user_agent.push(' ');
            self.user_agent.push_str(tag);
        }
    }

    /// Starts a request with the authorization and user-agent headers set.
    ///
    /// The bearer token is fetched from the authorizer per request, so an
    /// authorizer that refreshes internally always supplies a current token.
    pub fn request(
        &self,
        method: Method,
        url: &str,
    ) -> Result<reqwest::blocking::RequestBuilder, AuthError> {
        let mut builder = self.http.request(method, url);

        if !self.user_agent.is_empty() {
            let value = HeaderValue::from_str(&self.user_agent).map_err(|e| {
                AuthError::ConfigurationError(format!("invalid user agent: {e}"))
            })?;
            builder = builder.header(USER_AGENT, value);
        }

        if let Some(authorizer) = &self.authorizer {
            let token = authorizer.bearer_token()?;
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).map_err(
                    |e| AuthError::ConfigurationError(format!("invalid bearer token: {e}")),
                )?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder)
    }

    /// Shorthand for [`request`](Self::request) with `GET`.
    pub fn get(&self, url: &str) -> Result<reqwest::blocking::RequestBuilder, AuthError> {
        self.request(Method::GET, url)
    }
}

impl fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("user_agent", &self.user_agent)
            .field("has_authorizer", &self.authorizer.is_some())
            .finish_non_exhaustive()
    }
}
