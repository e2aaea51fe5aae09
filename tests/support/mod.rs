//! Shared test doubles for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use azauth::sources::CredentialSource;
use azauth::{AuthorizerHandle, SourceError, StaticAuthorizer};

/// Credential source double that answers from a script and records every
/// call it receives.
pub struct ScriptedSource {
    name: &'static str,
    token: Option<&'static str>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen_resources: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn succeeding(name: &'static str, token: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            token: Some(token),
            delay: None,
            calls: AtomicUsize::new(0),
            seen_resources: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            token: None,
            delay: None,
            calls: AtomicUsize::new(0),
            seen_resources: Mutex::new(Vec::new()),
        })
    }

    /// Succeeds after sleeping, to widen concurrency windows.
    pub fn slow(name: &'static str, token: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            token: Some(token),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            seen_resources: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_resources(&self) -> Vec<String> {
        self.seen_resources.lock().unwrap().clone()
    }
}

impl CredentialSource for ScriptedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn resolve(&self, resource: &str) -> Result<AuthorizerHandle, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_resources
            .lock()
            .unwrap()
            .push(resource.to_string());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match self.token {
            Some(token) => Ok(Arc::new(StaticAuthorizer::for_resource(token, resource))),
            None => Err(SourceError::new(self.name, "scripted failure")),
        }
    }
}
