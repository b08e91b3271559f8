//! EC2 instance metadata (IMDS) credentials.
//!
//! Uses IMDSv2 session tokens and falls back to IMDSv1 when the token
//! endpoint is unavailable. Each request is attempted exactly once.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::CredentialsError;
use crate::provider::ProvideCredentials;

/// Source name reported by [`ImdsCredentialsProvider`].
pub const IMDS_CREDENTIALS_SOURCE: &str = "EC2RoleProvider";

/// Default instance metadata endpoint.
pub const DEFAULT_IMDS_ENDPOINT: &str = "http://169.254.169.254";

const TOKEN_PATH: &str = "/latest/api/token";
const CREDENTIALS_PATH: &str = "/latest/meta-data/iam/security-credentials/";
const TOKEN_TTL_HEADER: &str = "x-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "x-aws-ec2-metadata-token";
const TOKEN_TTL_SECONDS: &str = "21600";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImdsCredentialsResponse {
    code: String,
    access_key_id: String,
    secret_access_key: String,
    token: String,
    expiration: DateTime<Utc>,
}

/// Provider fetching the instance role's credentials from IMDS.
#[derive(Debug, Clone)]
pub struct ImdsCredentialsProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl ImdsCredentialsProvider {
    /// Create a provider for `endpoint`, or the default endpoint when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::InstanceMetadata`] if the HTTP client
    /// cannot be built.
    pub fn new(endpoint: Option<&str>) -> Result<Self, CredentialsError> {
        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_IMDS_ENDPOINT)
            .trim_end_matches('/')
            .to_owned();

        let client = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| CredentialsError::InstanceMetadata {
                url: endpoint.clone(),
                source,
            })?;

        Ok(Self { endpoint, client })
    }

    /// Endpoint this provider talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request an IMDSv2 session token; `None` means fall back to IMDSv1.
    async fn session_token(&self) -> Result<Option<String>, CredentialsError> {
        let url = format!("{}{TOKEN_PATH}", self.endpoint);
        let resp = self
            .client
            .put(&url)
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
            .send()
            .await
            .map_err(|source| CredentialsError::InstanceMetadata {
                url: url.clone(),
                source,
            })?;

        match resp.status() {
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => {
                debug!(status = %resp.status(), "IMDSv2 token unavailable, using IMDSv1");
                Ok(None)
            }
            status if status.is_success() => {
                let token = resp
                    .text()
                    .await
                    .map_err(|source| CredentialsError::InstanceMetadata { url, source })?;
                Ok(Some(token.trim().to_owned()))
            }
            status => Err(CredentialsError::InvalidResponse(format!(
                "IMDS token request returned {status}"
            ))),
        }
    }

    async fn get(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Option<String>, CredentialsError> {
        let url = format!("{}{path}", self.endpoint);
        let mut req = self.client.get(&url);
        if let Some(token) = token {
            req = req.header(TOKEN_HEADER, token);
        }

        let resp = req
            .send()
            .await
            .map_err(|source| CredentialsError::InstanceMetadata {
                url: url.clone(),
                source,
            })?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => resp
                .text()
                .await
                .map(Some)
                .map_err(|source| CredentialsError::InstanceMetadata { url, source }),
            status => Err(CredentialsError::InvalidResponse(format!(
                "IMDS request to {path} returned {status}"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl ProvideCredentials for ImdsCredentialsProvider {
    async fn retrieve(&self) -> Result<Credentials, CredentialsError> {
        let token = self.session_token().await?;

        let roles = self
            .get(CREDENTIALS_PATH, token.as_deref())
            .await?
            .unwrap_or_default();
        let Some(role) = roles.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return Err(CredentialsError::NotLoaded(
                "no IAM role attached to the instance".to_owned(),
            ));
        };

        debug!(role, endpoint = %self.endpoint, "fetching instance role credentials");

        let body = self
            .get(&format!("{CREDENTIALS_PATH}{role}"), token.as_deref())
            .await?
            .ok_or_else(|| {
                CredentialsError::InvalidResponse(format!("credentials for role {role} not found"))
            })?;

        let resp: ImdsCredentialsResponse = serde_json::from_str(&body).map_err(|e| {
            CredentialsError::InvalidResponse(format!("malformed IMDS credentials: {e}"))
        })?;

        if resp.code != "Success" {
            return Err(CredentialsError::InvalidResponse(format!(
                "IMDS credentials code {}",
                resp.code
            )));
        }

        Ok(Credentials::new(
            resp.access_key_id,
            resp.secret_access_key,
            Some(resp.token),
            Some(resp.expiration),
            IMDS_CREDENTIALS_SOURCE,
        ))
    }
}
