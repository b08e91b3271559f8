//! Ordered fall-through over several providers.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::credentials::Credentials;
use crate::error::CredentialsError;
use crate::provider::{ProvideCredentials, SharedProvider};

/// Tries providers in order until one produces credentials.
///
/// A provider reporting [`CredentialsError::NotLoaded`] passes control to the
/// next one. Any other error stops the chain and is returned as is.
///
/// # Examples
///
/// ```
/// use awsbase_credentials::{
///     ChainProvider, EnvConfig, EnvironmentCredentialsProvider, StaticCredentialsProvider,
/// };
///
/// let chain = ChainProvider::first_try(
///     "Environment",
///     EnvironmentCredentialsProvider::new(EnvConfig::from_pairs(&[])),
/// )
/// .or_else("Static", StaticCredentialsProvider::new("AKID", "secret", ""));
///
/// assert_eq!(chain.names().collect::<Vec<_>>(), ["Environment", "Static"]);
/// ```
#[derive(Clone)]
pub struct ChainProvider {
    providers: Vec<(String, SharedProvider)>,
}

impl ChainProvider {
    /// Start a chain with its highest-priority provider.
    pub fn first_try(name: impl Into<String>, provider: impl ProvideCredentials + 'static) -> Self {
        Self {
            providers: vec![(name.into(), Arc::new(provider))],
        }
    }

    /// Append a lower-priority provider.
    #[must_use]
    pub fn or_else(
        mut self,
        name: impl Into<String>,
        provider: impl ProvideCredentials + 'static,
    ) -> Self {
        self.providers.push((name.into(), Arc::new(provider)));
        self
    }

    /// Provider names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for ChainProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainProvider")
            .field("providers", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait::async_trait]
impl ProvideCredentials for ChainProvider {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        let mut skipped = Vec::with_capacity(self.providers.len());

        for (name, provider) in &self.providers {
            match provider.retrieve().await {
                Ok(creds) => {
                    debug!(provider = %name, source = creds.source(), "loaded credentials");
                    return Ok(creds);
                }
                Err(CredentialsError::NotLoaded(reason)) => {
                    debug!(provider = %name, %reason, "provider not loaded, trying next");
                    skipped.push(format!("{name}: {reason}"));
                }
                Err(e) => {
                    debug!(provider = %name, error = %e, "provider failed");
                    return Err(e);
                }
            }
        }

        Err(CredentialsError::NotLoaded(format!(
            "no provider in chain returned credentials ({})",
            skipped.join("; ")
        )))
    }
}
