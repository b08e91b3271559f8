//! Resolved view of the process environment.
//!
//! The resolution pipeline never reads environment variables directly.
//! Instead an [`EnvConfig`] is built once at session start, either from the
//! real environment or from a fixed list of pairs in tests, and passed in
//! explicitly.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `AWS_PROFILE` / `AWS_DEFAULT_PROFILE` | Shared config profile |
//! | `AWS_SHARED_CREDENTIALS_FILE` | Credentials file (default `~/.aws/credentials`) |
//! | `AWS_CONFIG_FILE` | Config file (default `~/.aws/config`) |
//! | `AWS_ACCESS_KEY_ID` / `AWS_ACCESS_KEY` | Access key ID |
//! | `AWS_SECRET_ACCESS_KEY` / `AWS_SECRET_KEY` | Secret access key |
//! | `AWS_SESSION_TOKEN` | Session token |
//! | `AWS_REGION` / `AWS_DEFAULT_REGION` | Region |
//! | `AWS_EC2_METADATA_SERVICE_ENDPOINT` | Instance metadata endpoint |
//! | `AWS_EC2_METADATA_DISABLED` | Disable instance metadata |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Snapshot of the AWS-related environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    profile: Option<String>,
    shared_credentials_file: Option<PathBuf>,
    shared_config_file: Option<PathBuf>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
    region: Option<String>,
    ec2_metadata_service_endpoint: Option<String>,
    ec2_metadata_disabled: bool,
    home_dir: Option<PathBuf>,
}

impl EnvConfig {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Build a view from explicit `(name, value)` pairs.
    ///
    /// `HOME` in the pairs sets the home directory; without it no default
    /// shared file locations exist.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        let home = vars.get("HOME").map(PathBuf::from);
        Self::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()), home)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, home_dir: Option<PathBuf>) -> Self {
        let get = |keys: &[&str]| {
            keys.iter()
                .filter_map(|&key| lookup(key))
                .find(|value| !value.is_empty())
        };

        Self {
            profile: get(&["AWS_PROFILE", "AWS_DEFAULT_PROFILE"]),
            shared_credentials_file: get(&["AWS_SHARED_CREDENTIALS_FILE"]).map(PathBuf::from),
            shared_config_file: get(&["AWS_CONFIG_FILE"]).map(PathBuf::from),
            access_key_id: get(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"]),
            secret_access_key: get(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"]),
            session_token: get(&["AWS_SESSION_TOKEN"]),
            region: get(&["AWS_REGION", "AWS_DEFAULT_REGION"]),
            ec2_metadata_service_endpoint: get(&["AWS_EC2_METADATA_SERVICE_ENDPOINT"]),
            ec2_metadata_disabled: get(&["AWS_EC2_METADATA_DISABLED"])
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            home_dir,
        }
    }

    /// Profile selected by the environment.
    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Credentials file: the environment override, else `~/.aws/credentials`.
    #[must_use]
    pub fn shared_credentials_file(&self) -> Option<PathBuf> {
        self.shared_credentials_file
            .clone()
            .or_else(|| self.home_dir.as_ref().map(|h| h.join(".aws").join("credentials")))
    }

    /// Config file: the environment override, else `~/.aws/config`.
    #[must_use]
    pub fn shared_config_file(&self) -> Option<PathBuf> {
        self.shared_config_file
            .clone()
            .or_else(|| self.home_dir.as_ref().map(|h| h.join(".aws").join("config")))
    }

    /// Access key ID from the environment.
    #[must_use]
    pub fn access_key_id(&self) -> Option<&str> {
        self.access_key_id.as_deref()
    }

    /// Secret access key from the environment.
    #[must_use]
    pub fn secret_access_key(&self) -> Option<&str> {
        self.secret_access_key.as_deref()
    }

    /// Session token from the environment.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Region from the environment.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Instance metadata endpoint override.
    #[must_use]
    pub fn ec2_metadata_service_endpoint(&self) -> Option<&str> {
        self.ec2_metadata_service_endpoint.as_deref()
    }

    /// Whether `AWS_EC2_METADATA_DISABLED=true` is set.
    #[must_use]
    pub fn ec2_metadata_disabled(&self) -> bool {
        self.ec2_metadata_disabled
    }

    /// Home directory used for `~` expansion and default file locations.
    #[must_use]
    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }

    /// Expand a leading `~` in `path` against the home directory.
    #[must_use]
    pub fn expand_home(&self, path: &str) -> PathBuf {
        match (path.strip_prefix('~'), self.home_dir()) {
            (Some(""), Some(home)) => home.to_path_buf(),
            (Some(rest), Some(home)) if rest.starts_with(['/', '\\']) => home.join(&rest[1..]),
            _ => PathBuf::from(path),
        }
    }
}
