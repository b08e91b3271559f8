//! Error types for credential resolution.
//!
//! Two layers are distinguished:
//!
//! - [`CredentialsError`] is what an individual provider reports from
//!   [`retrieve`](crate::ProvideCredentials::retrieve).
//! - [`Error`] is the classified failure returned by the resolution pipeline.
//!   Its variants wrap the provider error that caused them, so the cause stays
//!   inspectable through [`std::error::Error::source`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Boxed error used for causes coming from external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by a single credentials provider.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    /// The provider is not configured in this environment. A provider chain
    /// moves on to its next provider on this error.
    #[error("credentials not loaded: {0}")]
    NotLoaded(String),

    /// The named profile does not exist in any of the shared files.
    #[error("failed to get shared config profile, {profile}")]
    ProfileNotFound {
        /// Profile that was requested.
        profile: String,
        /// Files that were searched.
        files: Vec<PathBuf>,
    },

    /// A shared credentials or config file could not be read.
    #[error("failed to read shared config file {}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A shared credentials or config file is not valid INI.
    #[error("failed to parse shared config file {}", path.display())]
    SharedConfigParse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ini::ParseError,
    },

    /// The provider found credentials, but they are unusable.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// A request to the instance metadata service failed.
    #[error("instance metadata request to {url} failed")]
    InstanceMetadata {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A credential endpoint answered with something that cannot be used.
    #[error("invalid response from credential endpoint: {0}")]
    InvalidResponse(String),

    /// Retrieval did not complete in time.
    #[error("credential retrieval timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other provider failure, e.g. an STS service error.
    #[error("credential provider error: {0}")]
    Provider(#[source] BoxError),

    /// Failure of a cache refresh, handed to every caller that waited on it.
    #[error(transparent)]
    Shared(Arc<CredentialsError>),
}

impl CredentialsError {
    /// Wrap an arbitrary error as a provider failure.
    pub fn provider_error(err: impl Into<BoxError>) -> Self {
        Self::Provider(err.into())
    }

    /// Whether a provider chain should fall through to its next provider.
    #[must_use]
    pub fn is_not_loaded(&self) -> bool {
        match self {
            Self::NotLoaded(_) => true,
            Self::Shared(inner) => inner.is_not_loaded(),
            _ => false,
        }
    }
}

/// Classified failure of the credential resolution pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No configured, environment, shared-file or instance-metadata source
    /// produced usable credentials.
    #[error(
        "no valid credential sources found. Please see https://docs.aws.amazon.com/sdkref/latest/guide/standardized-credentials.html for more information about providing credentials"
    )]
    NoValidCredentialSources {
        /// Why the base credentials could not be obtained.
        #[source]
        source: CredentialsError,
    },

    /// Base credentials were valid but the role could not be assumed.
    #[error("IAM Role ({role_arn}) cannot be assumed")]
    CannotAssumeRole {
        /// Role that was requested.
        role_arn: String,
        /// Why the role assumption failed.
        #[source]
        source: CredentialsError,
    },

    /// The configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience result type for the resolution pipeline.
pub type Result<T, E = Error> = std::result::Result<T, E>;
