//! File source enumeration and provenance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::FileError;
use crate::storage::ObjectStorage;

/// Represents the origin of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileSource {
    /// File loaded from an HTTP/HTTPS URL.
    Url,
    /// File created from raw bytes in memory.
    Bytes,
    /// File loaded from the local filesystem.
    File,
    /// File created from an async byte stream.
    Stream,
    /// File loaded from Amazon S3.
    S3,
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Url => write!(f, "Url"),
            FileSource::Bytes => write!(f, "Bytes"),
            FileSource::File => write!(f, "File"),
            FileSource::Stream => write!(f, "Stream"),
            FileSource::S3 => write!(f, "S3"),
        }
    }
}

/// Where an entity's bytes came from, with whatever is needed to go back there.
///
/// Kept apart from [`crate::Metadata`] so that `set_metadata` can never
/// redirect reads, deletes or refreshes to a different location. Remote
/// origins keep the client they were fetched with.
#[derive(Clone)]
pub(crate) enum Origin {
    Url {
        url: String,
        client: reqwest::Client,
    },
    Bytes,
    File(PathBuf),
    Stream,
    S3 {
        location: S3Location,
        storage: Arc<dyn ObjectStorage>,
    },
}

impl Origin {
    pub(crate) fn kind(&self) -> FileSource {
        match self {
            Origin::Url { .. } => FileSource::Url,
            Origin::Bytes => FileSource::Bytes,
            Origin::File(_) => FileSource::File,
            Origin::Stream => FileSource::Stream,
            Origin::S3 { .. } => FileSource::S3,
        }
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Url { url, .. } => f.debug_tuple("Url").field(url).finish(),
            Origin::Bytes => f.write_str("Bytes"),
            Origin::File(path) => f.debug_tuple("File").field(path).finish(),
            Origin::Stream => f.write_str("Stream"),
            Origin::S3 { location, .. } => f.debug_tuple("S3").field(location).finish(),
        }
    }
}

/// An object-storage location, written as `s3://{bucket}/{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub const SCHEME: &'static str = "s3://";

    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// The last `/`-separated segment of the key.
    pub fn file_name(&self) -> Option<&str> {
        self.key.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", Self::SCHEME, self.bucket, self.key)
    }
}

impl FromStr for S3Location {
    type Err = FileError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let without_scheme = url.strip_prefix(Self::SCHEME).ok_or_else(|| {
            FileError::invalid_source("parse_s3_url", format!("invalid S3 URL: {url}"))
        })?;

        let (bucket, key) = without_scheme.split_once('/').ok_or_else(|| {
            FileError::invalid_source("parse_s3_url", format!("invalid S3 URL (no key): {url}"))
        })?;

        if bucket.is_empty() || key.is_empty() {
            return Err(FileError::invalid_source(
                "parse_s3_url",
                format!("invalid S3 URL (empty bucket or key): {url}"),
            ));
        }

        Ok(Self::new(bucket, key))
    }
}
