//! Single-slot authorizer cache.
//!
//! Holds the one authorizer minted for the default management scope. A
//! condvar latch collapses concurrent first-time callers into a single
//! resolution: one thread runs the source chain while the rest wait for its
//! outcome, so a cold start never fans out into parallel token requests.
//! Entries have no TTL; the slot lives as long as its owner.

use std::sync::{Condvar, Mutex};

use crate::authorizer::AuthorizerHandle;
use crate::error::AuthError;

pub(crate) struct AuthorizerCache {
    slot: Mutex<Option<AuthorizerHandle>>,
    refreshing: (Mutex<bool>, Condvar),
}

impl AuthorizerCache {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            refreshing: (Mutex::new(false), Condvar::new()),
        }
    }

    fn cached(&self) -> Option<AuthorizerHandle> {
        if let Ok(slot) = self.slot.lock()
            && let Some(authorizer) = slot.as_ref()
        {
            return Some(authorizer.clone());
        }
        None
    }

    fn store(&self, authorizer: &AuthorizerHandle) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(authorizer.clone());
        }
        tracing::debug!(
            target: "azauth::cache",
            source = authorizer.source(),
            "cached authorizer for the management scope"
        );
    }

    /// Returns the cached authorizer, resolving it on first use.
    ///
    /// Failures are not cached: a failed resolution leaves the slot empty and
    /// the next caller runs `resolve` again.
    pub(crate) fn get_or_resolve<F>(&self, resolve: F) -> Result<AuthorizerHandle, AuthError>
    where
        F: Fn() -> Result<AuthorizerHandle, AuthError>,
    {
        if let Some(authorizer) = self.cached() {
            tracing::debug!(
                target: "azauth::cache",
                source = authorizer.source(),
                "management authorizer served from cache"
            );
            return Ok(authorizer);
        }

        let (lock, cvar) = &self.refreshing;
        let mut refreshing = match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if !*refreshing {
            // This thread resolves; everyone else waits on the latch.
            *refreshing = true;
            drop(refreshing);

            let result = resolve();
            if let Ok(authorizer) = &result {
                self.store(authorizer);
            }

            let mut refreshing = match lock.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *refreshing = false;
            cvar.notify_all();
            return result;
        }

        while *refreshing {
            refreshing = match cvar.wait(refreshing) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        drop(refreshing);

        if let Some(authorizer) = self.cached() {
            return Ok(authorizer);
        }

        // The resolving thread failed and left the slot empty. Make our own
        // attempt rather than report a failure that was never ours.
        let result = resolve();
        if let Ok(authorizer) = &result {
            self.store(authorizer);
        }
        result
    }
}
