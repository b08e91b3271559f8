//! AWS credential resolution for awsbase.
//!
//! Given a [`Config`] and an [`EnvConfig`] snapshot of the process
//! environment, [`resolve_credentials_provider`] selects one base credential
//! source, validates it, optionally assumes an IAM role on top of it, and
//! returns a [`CredentialsCache`] plus the name of the base source.
//!
//! ```no_run
//! use awsbase_credentials::{Config, EnvConfig, ProvideCredentials, resolve_credentials_provider};
//!
//! # async fn run() -> Result<(), awsbase_credentials::Error> {
//! let config = Config::builder().profile("dev".to_owned()).build();
//! let (provider, source) = resolve_credentials_provider(&config, &EnvConfig::from_env()).await?;
//! let creds = provider.retrieve().await.map_err(|source| {
//!     awsbase_credentials::Error::NoValidCredentialSources { source }
//! })?;
//! println!("{source}: {}", creds.access_key_id());
//! # Ok(())
//! # }
//! ```
//!
//! Failures are classified with [`is_no_valid_credential_sources_error`],
//! [`is_cannot_assume_role_error`] and [`err_code_equals`], which see through
//! any amount of wrapping.

mod assume_role;
mod cache;
mod chain;
mod classify;
mod config;
mod credentials;
mod env;
mod environment;
mod error;
mod imds;
mod profile;
mod provider;
mod resolve;
mod static_provider;
mod sts;

pub use assume_role::{
    ASSUME_ROLE_SOURCE, AssumeRoleClient, AssumeRoleClientFactory, AssumeRoleProvider,
    AssumeRoleRequest, DEFAULT_ASSUME_ROLE_DURATION, SessionTag, assume_role_provider,
};
pub use cache::CredentialsCache;
pub use chain::ChainProvider;
pub use classify::{
    err_code_equals, is_cannot_assume_role_error, is_no_valid_credential_sources_error,
};
pub use config::{AssumeRole, Config, ImdsState};
pub use credentials::Credentials;
pub use env::EnvConfig;
pub use environment::{ENV_CREDENTIALS_SOURCE, EnvironmentCredentialsProvider};
pub use error::{BoxError, CredentialsError, Error, Result};
pub use imds::{DEFAULT_IMDS_ENDPOINT, IMDS_CREDENTIALS_SOURCE, ImdsCredentialsProvider};
pub use profile::{
    ProfileCredentialsProvider, SHARED_CONFIG_SOURCE_PREFIX, SharedProfile, load_shared_profile,
};
pub use provider::{ProvideCredentials, SharedProvider};
pub use resolve::{resolve_credentials_provider, resolve_credentials_provider_with};
pub use static_provider::{STATIC_CREDENTIALS_SOURCE, StaticCredentialsProvider};
pub use sts::{DEFAULT_STS_REGION, StsAssumeRoleClient, StsClientFactory};
