//! Shared config and credentials files.
//!
//! Both files are INI. The credentials file uses plain `[name]` sections; the
//! config file uses `[profile name]` sections plus `[default]`. All files are
//! merged in order (config files first, then credentials files), later
//! values overriding earlier ones. Missing files are skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::error::CredentialsError;
use crate::provider::ProvideCredentials;

/// Prefix of the source name reported by [`ProfileCredentialsProvider`].
pub const SHARED_CONFIG_SOURCE_PREFIX: &str = "SharedConfigCredentials";

const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const SESSION_TOKEN: &str = "aws_session_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Config,
    Credentials,
}

impl FileKind {
    /// Map a raw section name to the profile it describes, if any.
    fn profile_name(self, section: &str) -> Option<&str> {
        let section = section.trim();
        match self {
            Self::Credentials => Some(section),
            Self::Config if section == "default" => Some(section),
            Self::Config => section
                .strip_prefix("profile ")
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        }
    }
}

/// A profile merged from all shared files.
#[derive(Debug, Clone, Default)]
pub struct SharedProfile {
    name: String,
    values: HashMap<String, (String, PathBuf)>,
}

impl SharedProfile {
    /// Profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of `key`, if any file set it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|(value, _)| value.as_str())
    }

    /// File that supplied the effective value of `key`.
    #[must_use]
    pub fn source_file(&self, key: &str) -> Option<&Path> {
        self.values.get(key).map(|(_, path)| path.as_path())
    }

    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Load `profile` from the given files.
///
/// # Errors
///
/// Returns [`CredentialsError::ProfileNotFound`] when no file defines the
/// profile, or an I/O or parse error for an unreadable file.
pub async fn load_shared_profile(
    profile: &str,
    credentials_files: &[PathBuf],
    config_files: &[PathBuf],
) -> Result<SharedProfile, CredentialsError> {
    let mut merged = SharedProfile {
        name: profile.to_owned(),
        values: HashMap::new(),
    };
    let mut found = false;

    let files = config_files
        .iter()
        .map(|p| (p, FileKind::Config))
        .chain(credentials_files.iter().map(|p| (p, FileKind::Credentials)));

    for (path, kind) in files {
        let Some(ini) = read_ini(path).await? else {
            continue;
        };

        for (section, props) in ini.iter() {
            let Some(name) = section.and_then(|s| kind.profile_name(s)) else {
                continue;
            };
            if name != profile {
                continue;
            }

            found = true;
            for (key, value) in props.iter() {
                merged
                    .values
                    .insert(key.to_owned(), (value.to_owned(), path.clone()));
            }
        }
    }

    if !found {
        return Err(CredentialsError::ProfileNotFound {
            profile: profile.to_owned(),
            files: config_files
                .iter()
                .chain(credentials_files)
                .cloned()
                .collect(),
        });
    }

    debug!(profile, keys = merged.values.len(), "loaded shared profile");
    Ok(merged)
}

async fn read_ini(path: &Path) -> Result<Option<Ini>, CredentialsError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "shared file not found, skipping");
            return Ok(None);
        }
        Err(source) => {
            return Err(CredentialsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let opt = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };

    Ini::load_from_str_opt(&content, opt)
        .map(Some)
        .map_err(|source| CredentialsError::SharedConfigParse {
            path: path.to_path_buf(),
            source,
        })
}

/// Provider reading static keys from a shared profile.
///
/// The reported source is `SharedConfigCredentials: <path>`, naming the file
/// that supplied `aws_access_key_id`.
#[derive(Debug, Clone)]
pub struct ProfileCredentialsProvider {
    profile: String,
    credentials_files: Vec<PathBuf>,
    config_files: Vec<PathBuf>,
}

impl ProfileCredentialsProvider {
    /// Create a provider for `profile` over the given files.
    pub fn new(
        profile: impl Into<String>,
        credentials_files: Vec<PathBuf>,
        config_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            profile: profile.into(),
            credentials_files,
            config_files,
        }
    }
}

#[async_trait::async_trait]
impl ProvideCredentials for ProfileCredentialsProvider {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        let profile =
            match load_shared_profile(&self.profile, &self.credentials_files, &self.config_files)
                .await
            {
                Ok(profile) => profile,
                Err(CredentialsError::ProfileNotFound { profile, .. }) => {
                    return Err(CredentialsError::NotLoaded(format!(
                        "shared profile {profile} not found"
                    )));
                }
                Err(e) => return Err(e),
            };

        if profile.is_empty() {
            warn!(profile = %self.profile, "shared profile has no keys");
        }

        let (Some(access_key_id), Some(path)) = (
            profile.get(ACCESS_KEY_ID).filter(|v| !v.is_empty()),
            profile.source_file(ACCESS_KEY_ID),
        ) else {
            return Err(CredentialsError::NotLoaded(format!(
                "shared profile {} has no {ACCESS_KEY_ID}",
                self.profile
            )));
        };

        let Some(secret_access_key) = profile.get(SECRET_ACCESS_KEY).filter(|v| !v.is_empty())
        else {
            return Err(CredentialsError::InvalidCredentials(format!(
                "shared profile {} has {ACCESS_KEY_ID} but no {SECRET_ACCESS_KEY}",
                self.profile
            )));
        };

        Ok(Credentials::new(
            access_key_id,
            secret_access_key,
            profile.get(SESSION_TOKEN).map(str::to_owned),
            None,
            format!("{SHARED_CONFIG_SOURCE_PREFIX}: {}", path.display()),
        ))
    }
}
