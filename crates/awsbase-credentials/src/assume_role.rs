//! Role assumption on top of base credentials.
//!
//! The wire call sits behind [`AssumeRoleClient`]. The default client is
//! [`StsAssumeRoleClient`](crate::StsAssumeRoleClient); tests and embedders
//! can inject their own through an [`AssumeRoleClientFactory`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::cache::CredentialsCache;
use crate::config::{AssumeRole, Config};
use crate::credentials::Credentials;
use crate::env::EnvConfig;
use crate::error::{CredentialsError, Error, Result};
use crate::provider::{ProvideCredentials, SharedProvider, validate};

/// Source name reported by [`AssumeRoleProvider`].
pub const ASSUME_ROLE_SOURCE: &str = "AssumeRoleProvider";

/// Session duration used when none is configured.
pub const DEFAULT_ASSUME_ROLE_DURATION: Duration = Duration::from_secs(15 * 60);

/// A session tag attached to the assumed-role session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// Fully normalized role-assumption request.
///
/// Optional collections are `None` rather than empty, so they are omitted
/// from the request instead of being sent empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    /// Role to assume.
    pub role_arn: String,
    /// Session name.
    pub session_name: String,
    /// Session duration.
    pub duration: Duration,
    /// External ID.
    pub external_id: Option<String>,
    /// Inline session policy.
    pub policy: Option<String>,
    /// Managed session policy ARNs.
    pub policy_arns: Option<Vec<String>>,
    /// Session tags, sorted by key.
    pub tags: Option<Vec<SessionTag>>,
    /// Transitive session tag keys.
    pub transitive_tag_keys: Option<Vec<String>>,
}

impl AssumeRoleRequest {
    /// Normalize an [`AssumeRole`] configuration into a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `role_arn` is empty or a
    /// transitive tag key is not one of the tag keys.
    pub fn from_config(role: &AssumeRole) -> Result<Self> {
        if role.role_arn.is_empty() {
            return Err(Error::InvalidConfig("assume role requires a role ARN".to_owned()));
        }

        if let Some(key) = role
            .transitive_tag_keys
            .iter()
            .find(|key| !role.tags.contains_key(key.as_str()))
        {
            return Err(Error::InvalidConfig(format!(
                "transitive tag key {key} is not a session tag"
            )));
        }

        let session_name = if role.session_name.is_empty() {
            format!("awsbase-{}", Utc::now().timestamp_millis())
        } else {
            role.session_name.clone()
        };

        let duration = role
            .duration
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_ASSUME_ROLE_DURATION);

        let mut tags: Vec<SessionTag> = role
            .tags
            .iter()
            .map(|(key, value)| SessionTag {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        tags.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(Self {
            role_arn: role.role_arn.clone(),
            session_name,
            duration,
            external_id: non_empty(&role.external_id),
            policy: non_empty(&role.policy),
            policy_arns: non_empty_vec(role.policy_arns.clone()),
            tags: non_empty_vec(tags),
            transitive_tag_keys: non_empty_vec(role.transitive_tag_keys.clone()),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn non_empty_vec<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

/// Performs the role-assumption exchange.
#[async_trait::async_trait]
pub trait AssumeRoleClient: Send + Sync + std::fmt::Debug {
    /// Exchange the base credentials for the role's credentials.
    async fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> Result<Credentials, CredentialsError>;
}

/// Builds an [`AssumeRoleClient`] signing with `base`.
pub trait AssumeRoleClientFactory: Send + Sync {
    /// Create a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration cannot produce a
    /// client.
    fn client(
        &self,
        base: SharedProvider,
        config: &Config,
        env: &EnvConfig,
    ) -> Result<Arc<dyn AssumeRoleClient>>;
}

/// Provider returning credentials of an assumed role.
#[derive(Debug, Clone)]
pub struct AssumeRoleProvider {
    client: Arc<dyn AssumeRoleClient>,
    request: AssumeRoleRequest,
}

impl AssumeRoleProvider {
    /// Create a provider issuing `request` through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn AssumeRoleClient>, request: AssumeRoleRequest) -> Self {
        Self { client, request }
    }

    /// The request sent on each refresh.
    #[must_use]
    pub fn request(&self) -> &AssumeRoleRequest {
        &self.request
    }
}

#[async_trait::async_trait]
impl ProvideCredentials for AssumeRoleProvider {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        let creds = self.client.assume_role(&self.request).await?;
        Ok(creds.with_source(ASSUME_ROLE_SOURCE))
    }
}

/// Build a cached, validated provider for `role`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for a malformed `role` and
/// [`Error::CannotAssumeRole`] if the exchange fails.
pub async fn assume_role_provider(
    base: SharedProvider,
    role: &AssumeRole,
    config: &Config,
    env: &EnvConfig,
    factory: &dyn AssumeRoleClientFactory,
) -> Result<CredentialsCache> {
    let request = AssumeRoleRequest::from_config(role)?;

    info!(
        role_arn = %request.role_arn,
        session_name = %request.session_name,
        external_id = request.external_id.as_deref().unwrap_or_default(),
        "assuming IAM role"
    );

    let client = factory.client(base, config, env)?;
    let provider = AssumeRoleProvider::new(client, request);

    let creds = validate(&provider, config.validation_timeout)
        .await
        .map_err(|source| Error::CannotAssumeRole {
            role_arn: role.role_arn.clone(),
            source,
        })?;

    let cache = CredentialsCache::new(provider);
    cache.prime(creds);
    Ok(cache)
}
