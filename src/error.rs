//! Error types for credential resolution.
//!
//! The resolver deliberately collapses per-source failures into the single
//! aggregate [`AuthError::NoAuthorizerAvailable`]: callers get a stable error
//! contract, while the specific reason each source failed is emitted on the
//! `tracing` side channel only.

use thiserror::Error;

/// Errors surfaced by this crate's public operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential source could produce an authorizer.
    ///
    /// Carries no per-source detail; consult the `azauth::resolver` log
    /// target for the outcome of each attempted source.
    #[error("no authorizer available")]
    NoAuthorizerAvailable,

    /// A single, explicitly requested source failed.
    ///
    /// Only returned by operations that name one source, such as
    /// [`file_authorizer`](crate::Authenticator::file_authorizer). Chain
    /// resolution never surfaces this variant.
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),

    /// Ambient environment settings could not be loaded at construction.
    #[error("environment settings unavailable: {0}")]
    SettingsUnavailable(String),

    /// Local configuration is invalid (bad proxy URL, malformed header, ...).
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// Transport-level failure talking to an identity endpoint.
    #[error("http error: {0}")]
    HttpError(String),

    /// A response or file could not be decoded.
    #[error("parse error: {0}")]
    ParseError(String),
}

/// A credential source's failure to produce an authorizer.
///
/// Adapter-level errors never cross the resolver boundary: the resolver logs
/// them and keeps trying the remaining sources. The `source` tag matches
/// [`crate::sources::CredentialSource::name`].
#[derive(Debug)]
pub struct SourceError {
    pub source: &'static str,
    pub reason: String,
}

// Not derived: thiserror would treat the `source` field as `Error::source()`,
// but it is a plain source-name tag, not a nested error.
impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "credential source '{}' unavailable: {}",
            self.source, self.reason
        )
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    pub fn new(source: &'static str, reason: impl Into<String>) -> Self {
        Self {
            source,
            reason: reason.into(),
        }
    }
}
