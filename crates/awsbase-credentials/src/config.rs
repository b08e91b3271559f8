//! Credential resolution configuration.
//!
//! [`Config`] describes the credential behavior a caller wants. It is built
//! once per session and never mutated. Empty strings and empty lists mean
//! "not set" and fall through to the environment.
//!
//! # Examples
//!
//! ```
//! use awsbase_credentials::{AssumeRole, Config};
//!
//! let config = Config::builder()
//!     .profile("dev".to_owned())
//!     .assume_role(Some(
//!         AssumeRole::builder()
//!             .role_arn("arn:aws:iam::123456789012:role/deploy".to_owned())
//!             .session_name("ci".to_owned())
//!             .build(),
//!     ))
//!     .build();
//!
//! assert_eq!(config.profile, "dev");
//! assert!(config.assume_role.as_ref().is_some_and(AssumeRole::is_enabled));
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::env::EnvConfig;

/// Desired credential behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Static access key ID.
    #[builder(default)]
    pub access_key: String,

    /// Static secret access key.
    #[builder(default)]
    pub secret_key: String,

    /// Static session token.
    #[builder(default)]
    pub token: String,

    /// Shared config profile name.
    #[builder(default)]
    pub profile: String,

    /// Shared credentials files, in increasing order of precedence.
    #[builder(default)]
    pub shared_credentials_files: Vec<String>,

    /// Shared config files, in increasing order of precedence.
    #[builder(default)]
    pub shared_config_files: Vec<String>,

    /// Role to assume on top of the base credentials.
    #[builder(default)]
    pub assume_role: Option<AssumeRole>,

    /// Region used for the role-assumption client.
    #[builder(default)]
    pub region: String,

    /// Region for STS, overriding [`Config::region`].
    #[builder(default)]
    pub sts_region: String,

    /// Custom STS endpoint URL.
    #[builder(default)]
    pub sts_endpoint: String,

    /// Custom instance metadata endpoint URL.
    #[builder(default)]
    pub ec2_metadata_service_endpoint: String,

    /// Whether the instance metadata source may be used.
    #[builder(default)]
    pub ec2_metadata_service_enable_state: ImdsState,

    /// Upper bound on each validation retrieval.
    #[builder(default)]
    #[serde(with = "optional_secs")]
    pub validation_timeout: Option<Duration>,
}

impl Config {
    /// Whether any static credential value is configured.
    #[must_use]
    pub fn has_static_credentials(&self) -> bool {
        !self.access_key.is_empty() || !self.secret_key.is_empty() || !self.token.is_empty()
    }

    /// Credentials files to read: the configured list with `~` expanded, or
    /// the environment default when none are configured.
    #[must_use]
    pub fn resolve_shared_credentials_files(&self, env: &EnvConfig) -> Vec<PathBuf> {
        resolve_files(
            &self.shared_credentials_files,
            env,
            env.shared_credentials_file(),
        )
    }

    /// Config files to read: the configured list with `~` expanded, or the
    /// environment default when none are configured.
    #[must_use]
    pub fn resolve_shared_config_files(&self, env: &EnvConfig) -> Vec<PathBuf> {
        resolve_files(&self.shared_config_files, env, env.shared_config_file())
    }

    /// Region for the role-assumption client.
    #[must_use]
    pub fn sts_region<'a>(&'a self, env: &'a EnvConfig) -> Option<&'a str> {
        [self.sts_region.as_str(), self.region.as_str()]
            .into_iter()
            .find(|r| !r.is_empty())
            .or_else(|| env.region())
    }

    /// Whether the instance metadata source is enabled.
    #[must_use]
    pub fn imds_enabled(&self, env: &EnvConfig) -> bool {
        match self.ec2_metadata_service_enable_state {
            ImdsState::Enabled => true,
            ImdsState::Disabled => false,
            ImdsState::Default => !env.ec2_metadata_disabled(),
        }
    }
}

fn resolve_files(
    configured: &[String],
    env: &EnvConfig,
    fallback: Option<PathBuf>,
) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = configured
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| env.expand_home(f))
        .collect();

    if files.is_empty() {
        fallback.into_iter().collect()
    } else {
        files
    }
}

/// Enable state of the instance metadata credential source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImdsState {
    /// Enabled unless `AWS_EC2_METADATA_DISABLED=true`.
    #[default]
    Default,
    /// Always enabled.
    Enabled,
    /// Never used.
    Disabled,
}

/// Role to assume with the base credentials.
///
/// Inert unless [`AssumeRole::role_arn`] is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct AssumeRole {
    /// ARN of the role to assume.
    #[builder(default)]
    pub role_arn: String,

    /// Session name; generated when empty.
    #[builder(default)]
    pub session_name: String,

    /// External ID required by the role's trust policy.
    #[builder(default)]
    pub external_id: String,

    /// Session duration; 15 minutes when unset.
    #[builder(default)]
    #[serde(with = "optional_secs")]
    pub duration: Option<Duration>,

    /// Inline session policy document (JSON).
    #[builder(default)]
    pub policy: String,

    /// Managed session policy ARNs.
    #[builder(default)]
    pub policy_arns: Vec<String>,

    /// Session tags.
    #[builder(default)]
    pub tags: HashMap<String, String>,

    /// Session tag keys that propagate to further role chaining.
    #[builder(default)]
    pub transitive_tag_keys: Vec<String>,
}

impl AssumeRole {
    /// Whether a role is actually requested.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.role_arn.is_empty()
    }
}

/// Serialize `Option<Duration>` as a number of seconds.
mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
