//! Resolved credential material.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// A set of AWS credentials together with the name of the mechanism that
/// produced them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    expires: Option<DateTime<Utc>>,
    source: String,
}

impl Credentials {
    /// Create credentials. An empty session token is stored as `None`.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        expires: Option<DateTime<Utc>>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.filter(|token| !token.is_empty()),
            expires,
            source: source.into(),
        }
    }

    /// Access key ID.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Session token, present for temporary credentials.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Expiry time, `None` for long-lived credentials.
    #[must_use]
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Name of the mechanism that produced these credentials.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Same key material reported under a different source name.
    #[must_use]
    pub(crate) fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Whether the credentials are expired at `now`, treating anything that
    /// expires within `window` as already expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        self.expires.is_some_and(|expires| expires - window <= now)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .field("expires", &self.expires)
            .field("source", &self.source)
            .finish()
    }
}

impl From<&Credentials> for aws_credential_types::Credentials {
    fn from(creds: &Credentials) -> Self {
        aws_credential_types::Credentials::new(
            creds.access_key_id.clone(),
            creds.secret_access_key.clone(),
            creds.session_token.clone(),
            creds.expires.map(std::time::SystemTime::from),
            "awsbase",
        )
    }
}
