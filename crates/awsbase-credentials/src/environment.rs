//! Credentials from environment variables.

use crate::credentials::Credentials;
use crate::env::EnvConfig;
use crate::error::CredentialsError;
use crate::provider::ProvideCredentials;

/// Source name reported by [`EnvironmentCredentialsProvider`].
pub const ENV_CREDENTIALS_SOURCE: &str = "EnvConfigCredentials";

/// Provider reading `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and
/// `AWS_SESSION_TOKEN` from an [`EnvConfig`] snapshot.
#[derive(Debug, Clone)]
pub struct EnvironmentCredentialsProvider {
    env: EnvConfig,
}

impl EnvironmentCredentialsProvider {
    /// Create a provider over the given environment view.
    #[must_use]
    pub fn new(env: EnvConfig) -> Self {
        Self { env }
    }
}

#[async_trait::async_trait]
impl ProvideCredentials for EnvironmentCredentialsProvider {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        let Some(access_key_id) = self.env.access_key_id() else {
            return Err(CredentialsError::NotLoaded(
                "AWS_ACCESS_KEY_ID is not set".to_owned(),
            ));
        };

        let Some(secret_access_key) = self.env.secret_access_key() else {
            return Err(CredentialsError::InvalidCredentials(
                "AWS_ACCESS_KEY_ID is set but AWS_SECRET_ACCESS_KEY is not".to_owned(),
            ));
        };

        Ok(Credentials::new(
            access_key_id,
            secret_access_key,
            self.env.session_token().map(str::to_owned),
            None,
            ENV_CREDENTIALS_SOURCE,
        ))
    }
}
