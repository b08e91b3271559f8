//! Credentials caching with single-flight refresh.

use std::fmt;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::CredentialsError;
use crate::provider::{ProvideCredentials, SharedProvider};

#[derive(Debug, Default)]
struct CacheState {
    credentials: Option<Credentials>,
    // Outcome of the latest refresh when it failed; cleared by any later update.
    failure: Option<Arc<CredentialsError>>,
    generation: u64,
}

/// What a caller finds in the cache.
enum Snapshot {
    Valid(Credentials),
    Failed(Arc<CredentialsError>),
    Empty,
}

struct Inner {
    provider: SharedProvider,
    state: RwLock<CacheState>,
    refresh: tokio::sync::Mutex<()>,
    expiry_window: TimeDelta,
}

/// Caches the credentials of an inner provider until they expire.
///
/// Concurrent callers that find the cache empty or expired share a single
/// refresh: only one of them calls the inner provider, the rest wait and
/// return its outcome, whether credentials or the error. Clones share the
/// same cache.
#[derive(Clone)]
pub struct CredentialsCache {
    inner: Arc<Inner>,
}

impl CredentialsCache {
    /// Wrap `provider` with no expiry window.
    pub fn new(provider: impl ProvideCredentials + 'static) -> Self {
        Self::with_expiry_window(provider, TimeDelta::zero())
    }

    /// Wrap `provider`, treating credentials that expire within `window` as
    /// already expired.
    pub fn with_expiry_window(
        provider: impl ProvideCredentials + 'static,
        window: TimeDelta,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider: Arc::new(provider),
                state: RwLock::new(CacheState::default()),
                refresh: tokio::sync::Mutex::new(()),
                expiry_window: window,
            }),
        }
    }

    /// The wrapped provider.
    #[must_use]
    pub fn provider(&self) -> &SharedProvider {
        &self.inner.provider
    }

    /// Drop the cached value; the next `retrieve` refreshes.
    pub fn invalidate(&self) {
        let mut state = self.inner.state.write();
        state.credentials = None;
        state.failure = None;
        state.generation += 1;
    }

    /// Seed the cache with an already validated value.
    pub(crate) fn prime(&self, credentials: Credentials) {
        let mut state = self.inner.state.write();
        state.credentials = Some(credentials);
        state.failure = None;
        state.generation += 1;
    }

    fn snapshot(&self) -> (Snapshot, u64) {
        let state = self.inner.state.read();
        let valid = state
            .credentials
            .as_ref()
            .filter(|c| !c.is_expired_at(Utc::now(), self.inner.expiry_window));

        let snapshot = match (valid, &state.failure) {
            (Some(creds), _) => Snapshot::Valid(creds.clone()),
            (None, Some(err)) => Snapshot::Failed(err.clone()),
            (None, None) => Snapshot::Empty,
        };
        (snapshot, state.generation)
    }

    fn publish(
        &self,
        result: Result<Credentials, CredentialsError>,
    ) -> Result<Credentials, CredentialsError> {
        let mut state = self.inner.state.write();
        state.generation += 1;
        match result {
            Ok(creds) => {
                state.credentials = Some(creds.clone());
                state.failure = None;
                Ok(creds)
            }
            Err(err) => {
                let err = Arc::new(err);
                state.failure = Some(err.clone());
                Err(CredentialsError::Shared(err))
            }
        }
    }
}

impl fmt::Debug for CredentialsCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsCache")
            .field("provider", &self.inner.provider)
            .field("expiry_window", &self.inner.expiry_window)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ProvideCredentials for CredentialsCache {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        let (snapshot, seen) = self.snapshot();
        if let Snapshot::Valid(creds) = snapshot {
            return Ok(creds);
        }

        let _guard = self.inner.refresh.lock().await;

        // A refresh finished while we waited: share its outcome.
        let (snapshot, current) = self.snapshot();
        if current != seen {
            match snapshot {
                Snapshot::Valid(creds) => return Ok(creds),
                Snapshot::Failed(err) => return Err(CredentialsError::Shared(err)),
                Snapshot::Empty => {}
            }
        }

        debug!(provider = ?self.inner.provider, "refreshing cached credentials");
        let result = self.inner.provider.retrieve().await;
        if let Err(e) = &result {
            debug!(error = %e, "credentials refresh failed");
        }
        self.publish(result)
    }
}
