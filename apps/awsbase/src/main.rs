//! awsbase - resolve AWS credentials and report where they came from.
//!
//! Runs the full credential resolution pipeline once and prints a JSON
//! summary: the credential source, the masked access key ID, the expiry and
//! the partition of the configured region.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWSBASE_CONFIG` | *(unset)* | Path to a JSON credentials configuration |
//! | `AWSBASE_REGION` | *(unset)* | Region to resolve the partition for |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! The standard `AWS_*` variables are honored by the resolution pipeline.

mod config;

use anyhow::{Context, Result};
use awsbase_credentials::{
    Credentials, EnvConfig, ProvideCredentials, is_cannot_assume_role_error,
    is_no_valid_credential_sources_error, resolve_credentials_provider,
};
use awsbase_endpoints::resolve_region;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartitionSummary {
    id: String,
    name: String,
    dns_suffix: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    source: String,
    access_key_id: String,
    has_session_token: bool,
    expires: Option<DateTime<Utc>>,
    region: Option<String>,
    partition: Option<PartitionSummary>,
}

/// Keep the last four characters of an access key ID.
fn mask_access_key(key: &str) -> String {
    let visible = key.len().saturating_sub(4);
    match key.get(visible..) {
        Some(tail) if visible > 0 => format!("{}{tail}", "*".repeat(visible)),
        _ => "*".repeat(key.len()),
    }
}

fn build_summary(source: String, creds: &Credentials, region: Option<String>) -> Summary {
    let partition = region.as_deref().and_then(resolve_region).map(|p| PartitionSummary {
        id: p.id().to_owned(),
        name: p.name().to_owned(),
        dns_suffix: p.dns_suffix().to_owned(),
    });

    Summary {
        source,
        access_key_id: mask_access_key(creds.access_key_id()),
        has_session_token: creds.session_token().is_some(),
        expires: creds.expires(),
        region,
        partition,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = AppConfig::from_env();
    init_tracing(&app.log_level)?;

    let config = app.credentials_config().await?;
    let env = EnvConfig::from_env();

    let (provider, source) = match resolve_credentials_provider(&config, &env).await {
        Ok(resolved) => resolved,
        Err(e) => {
            if is_no_valid_credential_sources_error(&e) {
                error!(error = %e, "no credential source is configured");
            } else if is_cannot_assume_role_error(&e) {
                error!(error = %e, "role assumption failed");
            }
            return Err(e).context("failed to resolve AWS credentials");
        }
    };
    info!(%source, "credentials resolved");

    let creds = provider
        .retrieve()
        .await
        .context("failed to retrieve AWS credentials")?;

    let region = app
        .region
        .clone()
        .or_else(|| Some(config.region.clone()).filter(|r| !r.is_empty()))
        .or_else(|| env.region().map(str::to_owned));

    let summary = build_summary(source, &creds, region);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
