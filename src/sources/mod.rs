//! Credential sources.
//!
//! A credential source is one way of turning ambient machine state into an
//! [`Authorizer`](crate::Authorizer) for a resource scope. Sources are
//! self-contained: each reads its own inputs, reports failure through
//! [`SourceError`], and never consults the others.

pub mod cli;
pub mod env;
pub mod file;

pub use cli::CliCredentialSource;
pub use env::EnvCredentialSource;
pub use file::{AuthFile, FileCredentialSource};

use crate::authorizer::AuthorizerHandle;
use crate::error::SourceError;

/// One way of obtaining an authorizer.
pub trait CredentialSource: Send + Sync {
    /// Stable short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Attempts to produce an authorizer scoped to `resource`.
    ///
    /// `resource` is the token audience exactly as the caller requested it;
    /// implementations must not substitute a different scope.
    fn resolve(&self, resource: &str) -> Result<AuthorizerHandle, SourceError>;
}
