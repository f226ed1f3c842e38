//! Client configuration.
//!
//! Credentials, profiles and the rest of the AWS settings come from the
//! standard AWS environment through `aws-config`. This struct only covers
//! what the library itself decides: HTTP client behaviour and S3 endpoint
//! overrides for S3-compatible stores.

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client as S3Client;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, FileError, Result};
use crate::storage::S3Storage;

const ENV_PREFIX: &str = "ANYFILE_";

/// Settings for the HTTP and S3 clients built by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Whole-request timeout for URL fetches. `None` waits forever.
    pub http_timeout_secs: Option<u64>,
    /// `User-Agent` sent with URL fetches.
    pub user_agent: String,
    /// Custom S3 endpoint (MinIO, LocalStack, R2, ...).
    pub s3_endpoint: Option<String>,
    /// Region override; otherwise taken from the AWS environment.
    pub s3_region: Option<String>,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    pub s3_force_path_style: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: Some(60),
            user_agent: concat!("anyfile/", env!("CARGO_PKG_VERSION")).to_string(),
            s3_endpoint: None,
            s3_region: None,
            s3_force_path_style: false,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `ANYFILE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut config = Self::default();
        for (name, value) in vars {
            let Some(name) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.trim();
            match name {
                "HTTP_TIMEOUT_SECS" => match value.parse::<u64>() {
                    Ok(0) => config.http_timeout_secs = None,
                    Ok(secs) => config.http_timeout_secs = Some(secs),
                    Err(_) => tracing::warn!(value, "ignoring invalid ANYFILE_HTTP_TIMEOUT_SECS"),
                },
                "USER_AGENT" if !value.is_empty() => config.user_agent = value.to_string(),
                "S3_ENDPOINT" if !value.is_empty() => config.s3_endpoint = Some(value.to_string()),
                "S3_REGION" if !value.is_empty() => config.s3_region = Some(value.to_string()),
                "S3_FORCE_PATH_STYLE" => {
                    config.s3_force_path_style = matches!(value, "1" | "true" | "TRUE" | "yes")
                }
                _ => {}
            }
        }
        config
    }

    /// Builds the HTTP client used for URL sources.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(secs) = self.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| FileError::new(ErrorKind::Transport, "http_client", e))
    }

    /// Builds an S3 client from the AWS environment plus these overrides.
    pub async fn s3_storage(&self) -> S3Storage {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &self.s3_endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(self.s3_force_path_style)
            .build();
        S3Storage::new(S3Client::from_conf(s3_config))
    }
}
