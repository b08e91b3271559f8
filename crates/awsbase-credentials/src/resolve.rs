//! Credential source selection.
//!
//! Resolution picks exactly one base source in precedence order:
//!
//! 1. static keys from [`Config`],
//! 2. otherwise a chain of the explicit profile (if configured), the
//!    environment, the shared-files profile and instance metadata.
//!
//! The base provider is validated once and cached. When a role is
//! configured, it is assumed with the cached base provider and the assumed
//! role's provider is validated and cached in turn.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::assume_role::{AssumeRoleClientFactory, assume_role_provider};
use crate::cache::CredentialsCache;
use crate::chain::ChainProvider;
use crate::config::Config;
use crate::env::EnvConfig;
use crate::environment::EnvironmentCredentialsProvider;
use crate::error::{CredentialsError, Error, Result};
use crate::imds::ImdsCredentialsProvider;
use crate::profile::{ProfileCredentialsProvider, load_shared_profile};
use crate::provider::{SharedProvider, validate};
use crate::static_provider::StaticCredentialsProvider;
use crate::sts::StsClientFactory;

const DEFAULT_PROFILE: &str = "default";

/// Resolve the effective credentials provider for `config`.
///
/// Returns the cached provider and the source name of the base
/// credentials. Role assumption uses the STS client.
///
/// # Errors
///
/// Returns [`Error::NoValidCredentialSources`] when no base source yields
/// credentials, and [`Error::CannotAssumeRole`] when the configured role
/// cannot be assumed.
pub async fn resolve_credentials_provider(
    config: &Config,
    env: &EnvConfig,
) -> Result<(CredentialsCache, String)> {
    resolve_credentials_provider_with(config, env, &StsClientFactory).await
}

/// Same as [`resolve_credentials_provider`] with a custom role-assumption
/// client.
///
/// # Errors
///
/// See [`resolve_credentials_provider`].
pub async fn resolve_credentials_provider_with(
    config: &Config,
    env: &EnvConfig,
    factory: &dyn AssumeRoleClientFactory,
) -> Result<(CredentialsCache, String)> {
    let (base, source) = resolve_base_provider(config, env).await?;

    let Some(role) = config.assume_role.as_ref().filter(|r| r.is_enabled()) else {
        return Ok((base, source));
    };

    let base: SharedProvider = Arc::new(base);
    let assumed = assume_role_provider(base, role, config, env, factory).await?;
    Ok((assumed, source))
}

async fn resolve_base_provider(
    config: &Config,
    env: &EnvConfig,
) -> Result<(CredentialsCache, String)> {
    let no_sources = |source: CredentialsError| Error::NoValidCredentialSources { source };

    let profile = Some(config.profile.as_str())
        .filter(|p| !p.is_empty())
        .or_else(|| env.profile());
    let credentials_files = config.resolve_shared_credentials_files(env);
    let config_files = config.resolve_shared_config_files(env);

    if let Some(profile) = profile {
        load_shared_profile(profile, &credentials_files, &config_files)
            .await
            .map_err(no_sources)?;
    }

    let provider: SharedProvider = if config.has_static_credentials() {
        info!("using static credentials from configuration");
        Arc::new(StaticCredentialsProvider::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            config.token.clone(),
        ))
    } else {
        let chain = default_chain(config, env, profile, credentials_files, config_files)
            .map_err(no_sources)?;
        info!(providers = ?chain.names().collect::<Vec<_>>(), "using default credential chain");
        Arc::new(chain)
    };

    let creds = validate(&provider, config.validation_timeout)
        .await
        .map_err(no_sources)?;
    let source = creds.source().to_owned();
    info!(%source, "resolved base credentials");

    let cache = CredentialsCache::new(provider);
    cache.prime(creds);
    Ok((cache, source))
}

fn default_chain(
    config: &Config,
    env: &EnvConfig,
    profile: Option<&str>,
    credentials_files: Vec<PathBuf>,
    config_files: Vec<PathBuf>,
) -> Result<ChainProvider, CredentialsError> {
    let shared = ProfileCredentialsProvider::new(
        profile.unwrap_or(DEFAULT_PROFILE),
        credentials_files,
        config_files,
    );
    let environment = EnvironmentCredentialsProvider::new(env.clone());

    let mut chain = if config.profile.is_empty() {
        ChainProvider::first_try("Environment", environment).or_else("SharedProfile", shared)
    } else {
        ChainProvider::first_try("SharedProfile", shared).or_else("Environment", environment)
    };

    if config.imds_enabled(env) {
        let endpoint = Some(config.ec2_metadata_service_endpoint.as_str())
            .filter(|e| !e.is_empty())
            .or_else(|| env.ec2_metadata_service_endpoint());
        chain = chain.or_else("Ec2InstanceMetadata", ImdsCredentialsProvider::new(endpoint)?);
    }

    Ok(chain)
}
