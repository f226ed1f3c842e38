//! Object-storage access.
//!
//! [`ObjectStorage`] is the seam between [`crate::File`] and a bucket store;
//! [`S3Storage`] implements it on top of the AWS SDK. Any other store (or a
//! test double) can be plugged into the `*_with_client` methods.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::DateTime;

use crate::error::{ErrorKind, FileError, Result};
use crate::resolver::TransportSignals;

/// A fetched object: its response fields and its full body.
#[derive(Debug, Clone)]
pub struct ObjectResponse {
    pub signals: TransportSignals,
    pub body: Bytes,
}

/// Headers sent along with an uploaded object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub content_disposition: Option<String>,
}

/// Operations the file entity needs from a bucket store.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch an object. A missing key must fail with [`ErrorKind::NotFound`].
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectResponse>;

    /// Store an object.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes, options: PutOptions) -> Result<()>;

    /// Produce a time-limited GET URL for an object.
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String>;
}

/// [`ObjectStorage`] backed by an `aws_sdk_s3::Client`.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
}

impl S3Storage {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Builds a client from the standard AWS environment.
    pub async fn from_env() -> Self {
        crate::config::ClientConfig::from_env().s3_storage().await
    }

    pub fn client(&self) -> &S3Client {
        &self.client
    }
}

fn s3_error(kind: ErrorKind, operation: &'static str, err: impl std::error::Error) -> FileError {
    FileError::new(kind, operation, DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStorage for S3Storage {
    #[tracing::instrument(name = "s3.get_object", skip(self))]
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectResponse> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let missing = e.as_service_error().is_some_and(|se| se.is_no_such_key());
                let kind = if missing { ErrorKind::NotFound } else { ErrorKind::Transport };
                s3_error(kind, "get_object", e)
            })?;

        let signals = TransportSignals {
            content_type: resp.content_type().map(str::to_string),
            content_length: resp.content_length().and_then(|n| u64::try_from(n).ok()),
            content_disposition: resp.content_disposition().map(str::to_string),
            etag: resp.e_tag().map(str::to_string),
            // GetObject responses carry no Content-MD5.
            content_md5: None,
            last_modified: resp
                .last_modified()
                .and_then(|lm| DateTime::from_timestamp(lm.secs(), lm.subsec_nanos())),
        };

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| s3_error(ErrorKind::Transport, "get_object", e))?
            .into_bytes();

        Ok(ObjectResponse { signals, body })
    }

    #[tracing::instrument(name = "s3.put_object", skip(self, body), fields(len = body.len()))]
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes, options: PutOptions) -> Result<()> {
        let mut req = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body));

        if let Some(mime) = options.content_type {
            req = req.content_type(mime);
        }
        if let Some(len) = options.content_length.and_then(|n| i64::try_from(n).ok()) {
            req = req.content_length(len);
        }
        if let Some(disposition) = options.content_disposition {
            req = req.content_disposition(disposition);
        }

        req.send()
            .await
            .map_err(|e| s3_error(ErrorKind::Transport, "put_object", e))?;
        Ok(())
    }

    #[tracing::instrument(name = "s3.presign_get", skip(self))]
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| s3_error(ErrorKind::Transport, "presign_get", e))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| s3_error(ErrorKind::Transport, "presign_get", e))?;

        Ok(presigned.uri().to_string())
    }
}
