//! Ordered credential resolution.
//!
//! The resolver walks its sources in priority order and stops at the first
//! one that produces an authorizer. Individual failures are expected during
//! normal operation, so they are logged under the `azauth::resolver` target
//! and otherwise discarded; only the fact that every source failed reaches
//! the caller.

use std::sync::Arc;

use crate::authorizer::AuthorizerHandle;
use crate::error::{AuthError, SourceError};
use crate::sources::CredentialSource;

/// Walks credential sources in a fixed order.
pub struct Resolver {
    sources: Vec<Arc<dyn CredentialSource>>,
    default_resource: String,
}

impl Resolver {
    /// Builds a resolver over an explicit source chain.
    ///
    /// `sources` is tried front to back; `default_resource` is the scope used
    /// by [`resolve_default`](Self::resolve_default), normally the active
    /// cloud's management endpoint.
    pub fn new(
        sources: Vec<Arc<dyn CredentialSource>>,
        default_resource: impl Into<String>,
    ) -> Self {
        Self {
            sources,
            default_resource: default_resource.into(),
        }
    }

    /// The sources in the order they are tried.
    pub fn sources(&self) -> &[Arc<dyn CredentialSource>] {
        &self.sources
    }

    /// The scope used when the caller does not name one.
    pub fn default_resource(&self) -> &str {
        &self.default_resource
    }

    /// Resolves an authorizer for the default (management) scope.
    pub fn resolve_default(&self) -> Result<AuthorizerHandle, AuthError> {
        self.resolve_for_resource(&self.default_resource)
    }

    /// Resolves an authorizer scoped to `resource`.
    ///
    /// Each source is attempted exactly once. On success the remaining
    /// sources are skipped. When every source fails the error carries no
    /// per-source detail; the attempt log is emitted via `tracing` instead.
    pub fn resolve_for_resource(&self, resource: &str) -> Result<AuthorizerHandle, AuthError> {
        let mut attempts: Vec<SourceError> = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            match source.resolve(resource) {
                Ok(authorizer) => {
                    tracing::debug!(
                        target: "azauth::resolver",
                        source = source.name(),
                        resource = %resource,
                        "credential source produced an authorizer"
                    );
                    return Ok(authorizer);
                }
                Err(error) => {
                    tracing::debug!(
                        target: "azauth::resolver",
                        source = source.name(),
                        resource = %resource,
                        reason = %error.reason,
                        "credential source unavailable"
                    );
                    attempts.push(error);
                }
            }
        }

        let summary = attempts
            .iter()
            .map(|error| format!("{}: {}", error.source, error.reason))
            .collect::<Vec<_>>()
            .join("; ");
        tracing::warn!(
            target: "azauth::resolver",
            resource = %resource,
            attempts = %summary,
            "no credential source produced an authorizer"
        );
        Err(AuthError::NoAuthorizerAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorizer::StaticAuthorizer;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        name: &'static str,
        token: Option<&'static str>,
        calls: AtomicUsize,
        seen_resources: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn succeeding(name: &'static str, token: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                token: Some(token),
                calls: AtomicUsize::new(0),
                seen_resources: Mutex::new(Vec::new()),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                token: None,
                calls: AtomicUsize::new(0),
                seen_resources: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CredentialSource for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }

        fn resolve(&self, resource: &str) -> Result<AuthorizerHandle, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_resources.lock().unwrap().push(resource.to_string());
            match self.token {
                Some(token) => Ok(Arc::new(StaticAuthorizer::for_resource(token, resource))),
                None => Err(SourceError::new(self.name, "stub declined")),
            }
        }
    }

    const SCOPE: &str = "https://vault.azure.net/";

    #[test]
    fn first_success_wins_and_skips_the_rest() {
        let first = StubSource::succeeding("file", "tok-file");
        let second = StubSource::succeeding("cli", "tok-cli");
        let resolver = Resolver::new(
            vec![first.clone(), second.clone()],
            "https://management.azure.com/",
        );

        let authorizer = resolver.resolve_for_resource(SCOPE).unwrap();
        assert_eq!(authorizer.source(), "static");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[test]
    fn failures_fall_through_in_order() {
        let first = StubSource::failing("file");
        let second = StubSource::failing("cli");
        let third = StubSource::succeeding("environment", "tok-env");
        let resolver = Resolver::new(
            vec![first.clone(), second.clone(), third.clone()],
            "https://management.azure.com/",
        );

        resolver.resolve_for_resource(SCOPE).unwrap();
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 1);
    }

    #[test]
    fn exhausted_chain_reports_the_aggregate_error() {
        let first = StubSource::failing("file");
        let second = StubSource::failing("cli");
        let resolver = Resolver::new(
            vec![first.clone(), second.clone()],
            "https://management.azure.com/",
        );

        let err = resolver.resolve_for_resource(SCOPE).unwrap_err();
        assert!(matches!(err, AuthError::NoAuthorizerAvailable));
        assert_eq!(err.to_string(), "no authorizer available");
        // Each source attempted exactly once.
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[test]
    fn requested_scope_reaches_every_source_verbatim() {
        let first = StubSource::failing("file");
        let second = StubSource::succeeding("cli", "tok");
        let resolver = Resolver::new(
            vec![first.clone(), second.clone()],
            "https://management.azure.com/",
        );

        let authorizer = resolver.resolve_for_resource(SCOPE).unwrap();
        assert_eq!(authorizer.resource(), SCOPE);
        assert_eq!(*first.seen_resources.lock().unwrap(), vec![SCOPE.to_string()]);
        assert_eq!(*second.seen_resources.lock().unwrap(), vec![SCOPE.to_string()]);
    }

    #[test]
    fn default_scope_is_the_management_endpoint() {
        let source = StubSource::succeeding("file", "tok");
        let resolver = Resolver::new(vec![source.clone()], "https://management.azure.com/");

        resolver.resolve_default().unwrap();
        assert_eq!(
            *source.seen_resources.lock().unwrap(),
            vec!["https://management.azure.com/".to_string()]
        );
    }

    #[test]
    fn empty_chain_yields_no_authorizer() {
        let resolver = Resolver::new(Vec::new(), "https://management.azure.com/");
        assert!(matches!(
            resolver.resolve_default(),
            Err(AuthError::NoAuthorizerAvailable)
        ));
    }
}
