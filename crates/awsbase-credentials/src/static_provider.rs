//! Static (explicitly configured) credentials.

use crate::credentials::Credentials;
use crate::error::CredentialsError;
use crate::provider::ProvideCredentials;

/// Source name reported by [`StaticCredentialsProvider`].
pub const STATIC_CREDENTIALS_SOURCE: &str = "StaticCredentials";

/// Provider returning a fixed key pair and optional session token.
///
/// # Examples
///
/// ```
/// use awsbase_credentials::{ProvideCredentials, StaticCredentialsProvider};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let provider = StaticCredentialsProvider::new("AKID", "secret", "");
/// let creds = provider.retrieve().await.unwrap();
/// assert_eq!(creds.access_key_id(), "AKID");
/// assert_eq!(creds.source(), "StaticCredentials");
/// # });
/// ```
#[derive(Clone)]
pub struct StaticCredentialsProvider {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
}

impl StaticCredentialsProvider {
    /// Create a provider from literal values; an empty token means none.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
        }
    }
}

impl std::fmt::Debug for StaticCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialsProvider")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ProvideCredentials for StaticCredentialsProvider {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(CredentialsError::InvalidCredentials(
                "static credentials are empty".to_owned(),
            ));
        }

        Ok(Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            Some(self.session_token.clone()),
            None,
            STATIC_CREDENTIALS_SOURCE,
        ))
    }
}
