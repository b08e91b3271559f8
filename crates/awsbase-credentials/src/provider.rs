//! The credentials provider capability.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::credentials::Credentials;
use crate::error::CredentialsError;

/// Something that can produce [`Credentials`].
///
/// Every credential source (static keys, environment, shared profile,
/// instance metadata, assumed role, cache, chain) implements this trait. The
/// trait uses `#[async_trait]` so providers can be stored as
/// `Arc<dyn ProvideCredentials>`.
#[async_trait::async_trait]
pub trait ProvideCredentials: Send + Sync + Debug {
    /// Retrieve credentials, performing I/O if needed.
    ///
    /// Dropping the returned future cancels any in-flight request.
    async fn retrieve(&self) -> Result<Credentials, CredentialsError>;
}

/// A reference-counted, type-erased provider.
pub type SharedProvider = Arc<dyn ProvideCredentials>;

#[async_trait::async_trait]
impl<T: ProvideCredentials + ?Sized> ProvideCredentials for Arc<T> {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        (**self).retrieve().await
    }
}

/// Retrieve once from `provider`, bounded by `timeout` when set.
pub(crate) async fn validate(
    provider: &dyn ProvideCredentials,
    timeout: Option<Duration>,
) -> Result<Credentials, CredentialsError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, provider.retrieve())
            .await
            .map_err(|_| CredentialsError::TimedOut(limit))?,
        None => provider.retrieve().await,
    }
}
