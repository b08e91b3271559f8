//! End-to-end credential resolution tests for awsbase.
//!
//! The instance metadata service and STS are mocked with `wiremock`, and
//! shared credentials files live in temporary directories, so these tests
//! run without network access or AWS accounts.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Access key returned by [`mock_imds`].
pub const IMDS_ACCESS_KEY: &str = "Ec2MetadataAccessKey";
/// Secret key returned by [`mock_imds`].
pub const IMDS_SECRET_KEY: &str = "Ec2MetadataSecretKey";
/// Session token returned by [`mock_imds`].
pub const IMDS_SESSION_TOKEN: &str = "Ec2MetadataSessionToken";

/// Start a mocked instance metadata service with one IAM role attached.
pub async fn mock_imds() -> MockServer {
    init_tracing();

    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/latest/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("imds-session-token"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/latest/meta-data/iam/security-credentials/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("test-role\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/latest/meta-data/iam/security-credentials/test-role"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{
                "Code": "Success",
                "LastUpdated": "2026-10-19T10:00:00Z",
                "Type": "AWS-HMAC",
                "AccessKeyId": "{IMDS_ACCESS_KEY}",
                "SecretAccessKey": "{IMDS_SECRET_KEY}",
                "Token": "{IMDS_SESSION_TOKEN}",
                "Expiration": "2099-01-01T00:00:00Z"
            }}"#
        )))
        .mount(&server)
        .await;

    server
}

/// A temporary home directory holding shared credentials and config files.
#[derive(Debug)]
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    /// Create an empty home directory.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: TempDir::new().expect("failed to create temp home"),
        }
    }

    /// Path of the home directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the home directory as a string.
    #[must_use]
    pub fn path_str(&self) -> String {
        self.dir.path().display().to_string()
    }

    /// Write `content` to `name` under the home directory.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, content).expect("failed to write test file");
        path
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a credentials file section.
#[must_use]
pub fn credentials_section(profile: &str, access_key: &str, secret_key: &str) -> String {
    format!("[{profile}]\naws_access_key_id = {access_key}\naws_secret_access_key = {secret_key}\n")
}

mod test_assume_role;
mod test_imds;
mod test_static;
