//! # azauth - Credential Resolution for Azure Service Clients
//!
//! azauth turns whatever credential material a machine has into authorized
//! HTTP clients for Azure services. It tries an SDK auth file, then the
//! Azure CLI, then service principal environment variables, and binds the
//! first authorizer it obtains onto the caller's client.
//!
#![deny(unsafe_code)]
//!
//! ## Features
//!
//! - **Ordered fallback**: file, CLI, and environment credentials are tried
//!   in a fixed order; the first success wins.
//! - **One stable error**: callers see `NoAuthorizerAvailable` when nothing
//!   works; per-source reasons go to the `tracing` targets `azauth::*`.
//! - **Scope-aware**: every operation accepts the token resource to target,
//!   defaulting to the active cloud's management endpoint.
//! - **Cloud-aware**: national clouds are selected with `AZURE_ENVIRONMENT`;
//!   no endpoint is hard-coded outside the cloud table.
//! - **Cached management scope**: the management authorizer is resolved once
//!   and shared, including across concurrent first callers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azauth::prelude::*;
//!
//! fn main() -> Result<(), azauth::AuthError> {
//!     let auth = Authenticator::new(AuthConfig::new().with_user_agent("mytool/1.4"))?;
//!
//!     // An authorized client for the management endpoint.
//!     let mut client = auth.new_client();
//!     auth.authorize_client(&mut client)?;
//!
//!     // Or a token scoped to another service.
//!     let vault = auth.authorizer_for_resource("https://vault.azure.net/")?;
//!     println!("token from source: {}", vault.source());
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber. Point a
//! filter at `azauth::resolver` to see why individual credential sources were
//! skipped, and at `azauth::cache` to observe cache hits.

pub mod authenticator;
pub mod authorizer;
pub mod client;
pub mod config;
pub mod defaults;
pub mod environment;
pub mod error;
pub mod resolver;
pub mod sources;
pub mod token;

mod cache;

pub use authenticator::Authenticator;
pub use authorizer::{Authorizer, AuthorizerHandle, BearerAuthorizer, StaticAuthorizer};
pub use client::ResourceClient;
pub use config::{AuthConfig, HttpConfig};
pub use environment::{Environment, EnvironmentSettings};
pub use error::{AuthError, SourceError};
pub use resolver::Resolver;
pub use token::{AccessToken, ClientCredentials};

/// Convenient pre-import module.
pub mod prelude {
    pub use crate::authenticator::Authenticator;
    pub use crate::authorizer::{Authorizer, AuthorizerHandle, BearerAuthorizer, StaticAuthorizer};
    pub use crate::client::ResourceClient;
    pub use crate::config::{AuthConfig, HttpConfig};
    pub use crate::environment::{Environment, EnvironmentSettings};
    pub use crate::error::{AuthError, SourceError};
    pub use crate::sources::{
        CliCredentialSource, CredentialSource, EnvCredentialSource, FileCredentialSource,
    };
}
