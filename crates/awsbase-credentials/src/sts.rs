//! STS-backed role assumption.

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::{self as sdk_provider, future};
use aws_sdk_sts::types::{PolicyDescriptorType, Tag};
use aws_smithy_types::retry::RetryConfig;
use chrono::DateTime;
use tracing::debug;

use crate::assume_role::{
    ASSUME_ROLE_SOURCE, AssumeRoleClient, AssumeRoleClientFactory, AssumeRoleRequest,
};
use crate::config::Config;
use crate::credentials::Credentials;
use crate::env::EnvConfig;
use crate::error::{CredentialsError, Error, Result};
use crate::provider::SharedProvider;

/// Region used for STS when nothing else is configured.
pub const DEFAULT_STS_REGION: &str = "us-east-1";

/// Exposes a [`SharedProvider`] to the SDK as its credentials provider.
#[derive(Debug)]
struct SdkCredentialsBridge(SharedProvider);

impl sdk_provider::ProvideCredentials for SdkCredentialsBridge {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(async move {
            self.0
                .retrieve()
                .await
                .map(|creds| aws_credential_types::Credentials::from(&creds))
                .map_err(sdk_provider::error::CredentialsError::provider_error)
        })
    }
}

/// Creates [`StsAssumeRoleClient`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct StsClientFactory;

impl AssumeRoleClientFactory for StsClientFactory {
    fn client(
        &self,
        base: SharedProvider,
        config: &Config,
        env: &EnvConfig,
    ) -> Result<Arc<dyn AssumeRoleClient>> {
        let region = config
            .sts_region(env)
            .unwrap_or(DEFAULT_STS_REGION)
            .to_owned();

        let mut builder = aws_sdk_sts::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(SdkCredentialsBridge(base))
            .retry_config(RetryConfig::disabled());

        if !config.sts_endpoint.is_empty() {
            builder = builder.endpoint_url(config.sts_endpoint.clone());
        }

        debug!(%region, endpoint = %config.sts_endpoint, "created STS client");

        let client: Arc<dyn AssumeRoleClient> = Arc::new(StsAssumeRoleClient::new(
            aws_sdk_sts::Client::from_conf(builder.build()),
        ));
        Ok(client)
    }
}

/// [`AssumeRoleClient`] calling the STS `AssumeRole` API.
#[derive(Debug, Clone)]
pub struct StsAssumeRoleClient {
    client: aws_sdk_sts::Client,
}

impl StsAssumeRoleClient {
    /// Wrap an existing STS client.
    #[must_use]
    pub fn new(client: aws_sdk_sts::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AssumeRoleClient for StsAssumeRoleClient {
    async fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> Result<Credentials, CredentialsError> {
        let duration = i32::try_from(request.duration.as_secs()).map_err(|_| {
            CredentialsError::provider_error(Error::InvalidConfig(format!(
                "assume role duration {:?} is too long",
                request.duration
            )))
        })?;

        let tags = request
            .tags
            .as_ref()
            .map(|tags| {
                tags.iter()
                    .map(|tag| Tag::builder().key(&tag.key).value(&tag.value).build())
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(CredentialsError::provider_error)?;

        let policy_arns = request.policy_arns.as_ref().map(|arns| {
            arns.iter()
                .map(|arn| PolicyDescriptorType::builder().arn(arn).build())
                .collect::<Vec<_>>()
        });

        let output = self
            .client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .duration_seconds(duration)
            .set_external_id(request.external_id.clone())
            .set_policy(request.policy.clone())
            .set_policy_arns(policy_arns)
            .set_tags(tags)
            .set_transitive_tag_keys(request.transitive_tag_keys.clone())
            .send()
            .await
            .map_err(CredentialsError::provider_error)?;

        let creds = output.credentials().ok_or_else(|| {
            CredentialsError::InvalidResponse("AssumeRole returned no credentials".to_owned())
        })?;

        let expiration = creds.expiration();
        let expires = DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos())
            .ok_or_else(|| {
                CredentialsError::InvalidResponse(format!(
                    "AssumeRole returned an invalid expiration {expiration:?}"
                ))
            })?;

        Ok(Credentials::new(
            creds.access_key_id(),
            creds.secret_access_key(),
            Some(creds.session_token().to_owned()),
            Some(expires),
            ASSUME_ROLE_SOURCE,
        ))
    }
}
