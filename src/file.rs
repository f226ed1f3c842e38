//! The core `File` struct and its operations.
//!
//! Provides a unified interface for creating, reading, writing, and manipulating
//! files from different sources: URLs, local filesystem, bytes, streams, and S3.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use sha2::{Digest, Sha256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::OnceCell;

use crate::config::ClientConfig;
use crate::content_disposition::attachment_header;
use crate::detection::CLASSIFY_PREFIX_LEN;
use crate::error::{ErrorKind, FileError, Result};
use crate::metadata::{Metadata, MetadataHint};
use crate::resolver::{resolve, FsStat, Signals, TransportSignals};
use crate::source::{FileSource, Origin, S3Location};
use crate::storage::{ObjectStorage, PutOptions, S3Storage};

/// A unified file type that can represent files from URLs, local filesystem,
/// raw bytes, async streams, and Amazon S3.
///
/// Content is read at most once. Local files are materialised lazily on the
/// first read; every other source is resident from construction on.
///
/// # Examples
///
/// ```no_run
/// # use anyfile::File;
/// # async fn example() -> anyfile::error::Result<()> {
/// // From bytes
/// let file = File::from_bytes(b"hello world".to_vec().into(), None).await?;
/// let text = file.read_text().await?;
/// assert_eq!(text, "hello world");
///
/// // From local file
/// let file = File::from_file("/path/to/file.txt", None).await?;
/// println!("Size: {:?}", file.size());
/// # Ok(())
/// # }
/// ```
pub struct File {
    origin: Origin,
    metadata: Metadata,
    content: OnceCell<Bytes>,
}

impl File {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    fn resident(origin: Origin, metadata: Metadata, data: Bytes) -> Self {
        let file = Self {
            origin,
            metadata,
            content: OnceCell::from(data),
        };
        tracing::info!(source = %file.source(), metadata = ?file.metadata, "file created");
        file
    }

    /// Create a `File` from raw bytes.
    pub async fn from_bytes(data: Bytes, hint: Option<MetadataHint>) -> Result<Self> {
        let metadata = resolve(
            FileSource::Bytes,
            hint.as_ref(),
            &Signals {
                content: Some(&data[..]),
                content_len: Some(data.len() as u64),
                ..Default::default()
            },
        );
        Ok(Self::resident(Origin::Bytes, metadata, data))
    }

    /// Create a `File` from a local filesystem path.
    ///
    /// Only the leading bytes needed for type detection are read here; the
    /// rest is loaded by the first call that needs the content.
    pub async fn from_file<P: AsRef<Path>>(path: P, hint: Option<MetadataHint>) -> Result<Self> {
        const OP: &str = "from_file";
        let path = path.as_ref();

        let fs_meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| FileError::io(ErrorKind::Read, OP, e))?;
        if fs_meta.is_dir() {
            return Err(FileError::new(
                ErrorKind::Read,
                OP,
                format!("{} is a directory", path.display()),
            ));
        }
        let stat = FsStat::from(&fs_meta);

        let mut prefix = Vec::with_capacity(CLASSIFY_PREFIX_LEN);
        tokio::fs::File::open(path)
            .await
            .map_err(|e| FileError::io(ErrorKind::Read, OP, e))?
            .take(CLASSIFY_PREFIX_LEN as u64)
            .read_to_end(&mut prefix)
            .await
            .map_err(|e| FileError::io(ErrorKind::Read, OP, e))?;

        let metadata = resolve(
            FileSource::File,
            hint.as_ref(),
            &Signals {
                stat: Some(&stat),
                path: Some(path),
                content: Some(&prefix[..]),
                ..Default::default()
            },
        );

        // Small files are already fully in hand.
        let content = if (prefix.len() as u64) == stat.size && prefix.len() < CLASSIFY_PREFIX_LEN {
            OnceCell::from(Bytes::from(prefix))
        } else {
            OnceCell::new()
        };

        tracing::info!(?metadata, "file created from filesystem");
        Ok(Self {
            origin: Origin::File(path.to_path_buf()),
            metadata,
            content,
        })
    }

    /// Create a `File` from an HTTP/HTTPS URL using a client configured from
    /// the environment.
    pub async fn from_url(url: &str, hint: Option<MetadataHint>) -> Result<Self> {
        let client = ClientConfig::from_env().http_client()?;
        Self::from_url_with_client(&client, url, hint).await
    }

    /// Create a `File` from an HTTP/HTTPS URL using the given client.
    ///
    /// Any non-2xx status, connection failure, timeout, or body stream error
    /// fails construction. The entity keeps `client` for later refreshes.
    pub async fn from_url_with_client(
        client: &reqwest::Client,
        url: &str,
        hint: Option<MetadataHint>,
    ) -> Result<Self> {
        const OP: &str = "from_url";
        let transport = |e: reqwest::Error| FileError::new(ErrorKind::Transport, OP, e);

        let response = client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FileError::new(
                ErrorKind::Transport,
                OP,
                format!("unexpected status {status} for {url}"),
            ));
        }

        let signals = TransportSignals::from_headers(response.headers());

        let mut buf = BytesMut::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk.map_err(transport)?);
        }
        let data = buf.freeze();

        let metadata = resolve(
            FileSource::Url,
            hint.as_ref(),
            &Signals {
                transport: Some(&signals),
                url: Some(url),
                content: Some(&data[..]),
                content_len: Some(data.len() as u64),
                ..Default::default()
            },
        );
        let origin = Origin::Url {
            url: url.to_string(),
            client: client.clone(),
        };
        Ok(Self::resident(origin, metadata, data))
    }

    /// Create a `File` from an async byte stream.
    ///
    /// The stream is consumed chunk by chunk and buffered into memory.
    pub async fn from_stream<S>(stream: S, hint: Option<MetadataHint>) -> Result<Self>
    where
        S: Stream<Item = std::result::Result<Bytes, std::io::Error>>,
    {
        let mut buf = BytesMut::new();
        tokio::pin!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FileError::io(ErrorKind::Read, "from_stream", e))?;
            buf.extend_from_slice(&chunk);
        }
        let data = buf.freeze();

        let metadata = resolve(
            FileSource::Stream,
            hint.as_ref(),
            &Signals {
                content: Some(&data[..]),
                content_len: Some(data.len() as u64),
                ..Default::default()
            },
        );
        Ok(Self::resident(Origin::Stream, metadata, data))
    }

    /// Create a `File` from an S3 bucket and key.
    pub async fn from_s3(bucket: &str, key: &str, hint: Option<MetadataHint>) -> Result<Self> {
        let storage = Arc::new(S3Storage::from_env().await);
        Self::from_s3_with_client(storage, bucket, key, hint).await
    }

    /// Create a `File` from a bucket and key using the given object storage.
    ///
    /// The entity keeps `storage`: refreshes and signed URLs go back to the
    /// same store.
    pub async fn from_s3_with_client(
        storage: Arc<dyn ObjectStorage>,
        bucket: &str,
        key: &str,
        hint: Option<MetadataHint>,
    ) -> Result<Self> {
        let location = S3Location::new(bucket, key);
        let (metadata, data) = fetch_object(storage.as_ref(), &location, hint.as_ref()).await?;
        Ok(Self::resident(Origin::S3 { location, storage }, metadata, data))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Returns the file source type.
    pub fn source(&self) -> FileSource {
        self.origin.kind()
    }

    /// Returns a reference to the full metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the file name, if known.
    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    /// Returns the MIME type, if known.
    pub fn mime_type(&self) -> Option<&str> {
        self.metadata.mime_type.as_deref()
    }

    /// Returns the file size in bytes, if known.
    pub fn size(&self) -> Option<u64> {
        self.metadata.size
    }

    /// Returns the file extension (without dot), if known.
    pub fn extension(&self) -> Option<&str> {
        self.metadata.extension.as_deref()
    }

    /// Returns the URL the file was loaded from, if applicable.
    pub fn url(&self) -> Option<&str> {
        self.metadata.url.as_deref()
    }

    /// Returns the filesystem path, if applicable.
    pub fn path(&self) -> Option<&str> {
        self.metadata.path.as_deref()
    }

    /// Returns the transport-supplied hash/etag, if known.
    pub fn hash(&self) -> Option<&str> {
        self.metadata.hash.as_deref()
    }

    /// Returns when the file was last modified, if known.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.metadata.last_modified
    }

    /// Returns when the file was created, if known.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.metadata.created_at
    }

    /// True once the content is held in memory.
    pub fn is_resident(&self) -> bool {
        self.content.initialized()
    }

    // -----------------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------------

    /// Read the file contents as raw bytes.
    ///
    /// The first call may hit the filesystem; later calls return the cached
    /// copy without touching the source again.
    pub async fn read(&self) -> Result<Bytes> {
        let data = self.content.get_or_try_init(|| self.materialize()).await?;
        Ok(data.clone())
    }

    /// Read the file contents as a UTF-8 string. Invalid sequences are
    /// replaced with U+FFFD.
    pub async fn read_text(&self) -> Result<String> {
        let data = self.read().await?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    async fn materialize(&self) -> Result<Bytes> {
        match &self.origin {
            Origin::File(path) => {
                tracing::debug!(path = %path.display(), "loading file content");
                tokio::fs::read(path)
                    .await
                    .map(Bytes::from)
                    .map_err(|e| FileError::io(ErrorKind::Read, "read", e))
            }
            // Every other origin is resident from construction.
            origin => Err(FileError::new(
                ErrorKind::Read,
                "read",
                format!("no content available for {} source", origin.kind()),
            )),
        }
    }

    // -----------------------------------------------------------------------
    // Write operations
    // -----------------------------------------------------------------------

    /// Write the content to a local path and return a new `File` for it.
    ///
    /// `self` and its cached content are left untouched.
    pub async fn save<P: AsRef<Path>>(&self, destination: P) -> Result<File> {
        const OP: &str = "save";
        let destination = destination.as_ref();

        // Saving onto itself (through any alias) leaves the file as it is.
        if let Origin::File(path) = &self.origin {
            if same_file(path, destination).await {
                return File::from_file(destination, None).await;
            }
        }

        match (&self.origin, self.content.get()) {
            // Not read yet: copy on disk instead of pulling it into memory.
            (Origin::File(path), None) => {
                tokio::fs::copy(path, destination)
                    .await
                    .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
            }
            _ => {
                let data = self.read().await?;
                let mut out = tokio::fs::File::create(destination)
                    .await
                    .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
                out.write_all(&data)
                    .await
                    .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
                out.flush()
                    .await
                    .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
            }
        }

        tracing::info!(destination = %destination.display(), source = %self.source(), "file saved");
        File::from_file(destination, None).await
    }

    /// Move the file to a new location on the filesystem.
    ///
    /// Local files are renamed, falling back to copy and remove when the
    /// rename fails (e.g. across filesystems). Other sources are written to
    /// `destination`.
    pub async fn move_to<P: AsRef<Path>>(self, destination: P) -> Result<File> {
        const OP: &str = "move_to";
        let destination = destination.as_ref();
        let Origin::File(path) = &self.origin else {
            return self.save(destination).await;
        };

        if same_file(path, destination).await {
            return File::from_file(destination, None).await;
        }

        if let Err(e) = tokio::fs::rename(path, destination).await {
            tracing::debug!(error = %e, "rename failed, copying instead");
            self.save(destination).await?;
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
        }
        tracing::info!(from = %path.display(), to = %destination.display(), "file moved");
        File::from_file(destination, None).await
    }

    /// Delete the file from the filesystem.
    ///
    /// Only files with source [`FileSource::File`] can be deleted.
    pub async fn delete(&self) -> Result<()> {
        const OP: &str = "delete";
        let path = self.local_path(OP)?;
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
        tracing::info!(path = %path.display(), "file deleted");
        Ok(())
    }

    /// Append content to the end of the file on disk, then refresh.
    pub async fn append(&mut self, content: impl AsRef<[u8]>) -> Result<()> {
        const OP: &str = "append";
        let path = self.local_path(OP)?;

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
        file.write_all(content.as_ref())
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
        file.flush()
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;

        tracing::info!(path = %path.display(), len = content.as_ref().len(), "appended to file");
        self.refresh().await
    }

    /// Insert content at the beginning of the file on disk, then refresh.
    pub async fn prepend(&mut self, content: impl AsRef<[u8]>) -> Result<()> {
        const OP: &str = "prepend";
        let path = self.local_path(OP)?;

        // Read from disk, not the cache: the file may have changed since.
        let existing = tokio::fs::read(path)
            .await
            .map_err(|e| FileError::io(ErrorKind::Read, OP, e))?;
        let mut combined = Vec::with_capacity(content.as_ref().len() + existing.len());
        combined.extend_from_slice(content.as_ref());
        combined.extend_from_slice(&existing);

        tokio::fs::write(path, combined)
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;

        tracing::info!(path = %path.display(), len = content.as_ref().len(), "prepended to file");
        self.refresh().await
    }

    /// Truncate (or extend with zeros) the file on disk to `size` bytes, then refresh.
    pub async fn truncate(&mut self, size: u64) -> Result<()> {
        const OP: &str = "truncate";
        let path = self.local_path(OP)?;

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
        file.set_len(size)
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;

        tracing::info!(path = %path.display(), size, "file truncated");
        self.refresh().await
    }

    /// Rebuild this entity from its provenance, replacing source, metadata
    /// and cached content in one step.
    ///
    /// Metadata set through [`File::set_metadata`] is discarded. Files built
    /// from bytes or streams have nothing to go back to and fail with
    /// [`ErrorKind::InvalidSource`].
    pub async fn refresh(&mut self) -> Result<()> {
        let fresh = match &self.origin {
            Origin::File(path) => File::from_file(path, None).await?,
            Origin::Url { url, client } => File::from_url_with_client(client, url, None).await?,
            Origin::S3 { location, storage } => {
                File::from_s3_with_client(Arc::clone(storage), &location.bucket, &location.key, None)
                    .await?
            }
            Origin::Bytes | Origin::Stream => {
                return Err(FileError::invalid_source(
                    "refresh",
                    format!("cannot refresh {} source", self.source()),
                ))
            }
        };
        *self = fresh;
        tracing::info!(source = %self.source(), metadata = ?self.metadata, "file refreshed");
        Ok(())
    }

    fn local_path(&self, operation: &'static str) -> Result<&Path> {
        match &self.origin {
            Origin::File(path) => Ok(path),
            origin => Err(FileError::invalid_source(
                operation,
                format!("cannot {operation} non-file source {}", origin.kind()),
            )),
        }
    }

    // -----------------------------------------------------------------------
    // Filesystem queries
    // -----------------------------------------------------------------------

    /// Whether the underlying file exists. Always `true` for other sources.
    pub async fn exists(&self) -> bool {
        match &self.origin {
            Origin::File(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            _ => true,
        }
    }

    /// Whether the underlying file can be opened for reading. Always `true`
    /// for other sources.
    pub async fn is_readable(&self) -> bool {
        match &self.origin {
            Origin::File(path) => tokio::fs::File::open(path).await.is_ok(),
            _ => true,
        }
    }

    /// Whether the underlying file can be opened for writing. Always `false`
    /// for other sources.
    pub async fn is_writable(&self) -> bool {
        match &self.origin {
            Origin::File(path) => tokio::fs::OpenOptions::new()
                .write(true)
                .open(path)
                .await
                .is_ok(),
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Checksum
    // -----------------------------------------------------------------------

    /// Calculate the SHA-256 checksum of the file contents.
    pub async fn checksum(&self) -> Result<String> {
        let data = self.read().await?;
        let mut hasher = Sha256::new();
        hasher.update(&data);
        Ok(hex::encode(hasher.finalize()))
    }

    // -----------------------------------------------------------------------
    // S3 operations
    // -----------------------------------------------------------------------

    /// Upload the file to an S3 bucket.
    pub async fn upload_to_s3(&self, bucket: &str, key: &str) -> Result<()> {
        let storage = S3Storage::from_env().await;
        self.upload_to_s3_with_client(&storage, bucket, key).await
    }

    /// Upload the file using the given object storage.
    ///
    /// Content type and disposition come from the current metadata; the
    /// length is that of the bytes actually sent.
    pub async fn upload_to_s3_with_client(
        &self,
        storage: &dyn ObjectStorage,
        bucket: &str,
        key: &str,
    ) -> Result<()> {
        let data = self.read().await?;
        let options = PutOptions {
            content_type: self.metadata.mime_type.clone(),
            content_length: Some(data.len() as u64),
            content_disposition: self.metadata.name.as_deref().map(attachment_header),
        };
        storage.put_object(bucket, key, data, options).await?;
        tracing::info!(bucket, key, source = %self.source(), "file uploaded");
        Ok(())
    }

    /// Upload to S3 and return a new S3-backed `File`; `self` is untouched.
    pub async fn save_to_s3(&self, bucket: &str, key: &str) -> Result<File> {
        let storage = Arc::new(S3Storage::from_env().await);
        self.save_to_s3_with_client(storage, bucket, key).await
    }

    pub async fn save_to_s3_with_client(
        &self,
        storage: Arc<dyn ObjectStorage>,
        bucket: &str,
        key: &str,
    ) -> Result<File> {
        self.upload_to_s3_with_client(storage.as_ref(), bucket, key).await?;
        File::from_s3_with_client(storage, bucket, key, None).await
    }

    /// Upload to S3, remove the local original if there is one, and return
    /// the new S3-backed `File`.
    pub async fn move_to_s3(self, bucket: &str, key: &str) -> Result<File> {
        let storage = Arc::new(S3Storage::from_env().await);
        self.move_to_s3_with_client(storage, bucket, key).await
    }

    pub async fn move_to_s3_with_client(
        self,
        storage: Arc<dyn ObjectStorage>,
        bucket: &str,
        key: &str,
    ) -> Result<File> {
        self.upload_to_s3_with_client(storage.as_ref(), bucket, key).await?;
        if let Origin::File(path) = &self.origin {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| FileError::io(ErrorKind::Write, "move_to_s3", e))?;
        }
        File::from_s3_with_client(storage, bucket, key, None).await
    }

    /// Download an S3 object to a local path and return the local `File`.
    pub async fn download_from_s3<P: AsRef<Path>>(bucket: &str, key: &str, destination: P) -> Result<File> {
        let storage = S3Storage::from_env().await;
        Self::download_from_s3_with_client(&storage, bucket, key, destination).await
    }

    pub async fn download_from_s3_with_client<P: AsRef<Path>>(
        storage: &dyn ObjectStorage,
        bucket: &str,
        key: &str,
        destination: P,
    ) -> Result<File> {
        const OP: &str = "download_from_s3";
        let destination = destination.as_ref();
        let (_, data) = fetch_object(storage, &S3Location::new(bucket, key), None).await?;
        tokio::fs::write(destination, &data)
            .await
            .map_err(|e| FileError::io(ErrorKind::Write, OP, e))?;
        tracing::info!(bucket, key, destination = %destination.display(), "object downloaded");
        File::from_file(destination, None).await
    }

    /// The object-storage location behind this file, if any: its own origin
    /// for S3 sources, otherwise an `s3://` URL set in its metadata.
    pub fn s3_location(&self) -> Option<S3Location> {
        match &self.origin {
            Origin::S3 { location, .. } => Some(location.clone()),
            _ => self.metadata.url.as_deref()?.parse().ok(),
        }
    }

    /// Generate a presigned URL for accessing an S3 object.
    ///
    /// S3-sourced files sign through the store they were fetched from;
    /// anything else goes through a client configured from the environment.
    pub async fn get_signed_url(&self, expires_in: Duration) -> Result<String> {
        // Checked before any client is built.
        self.signed_url_location()?;
        if let Origin::S3 { storage, .. } = &self.origin {
            return self.get_signed_url_with_client(storage.as_ref(), expires_in).await;
        }
        let storage = S3Storage::from_env().await;
        self.get_signed_url_with_client(&storage, expires_in).await
    }

    /// Generate a presigned URL using the given object storage.
    pub async fn get_signed_url_with_client(
        &self,
        storage: &dyn ObjectStorage,
        expires_in: Duration,
    ) -> Result<String> {
        let location = self.signed_url_location()?;
        storage
            .presign_get(&location.bucket, &location.key, expires_in)
            .await
    }

    fn signed_url_location(&self) -> Result<S3Location> {
        self.s3_location().ok_or_else(|| {
            FileError::invalid_source(
                "get_signed_url",
                format!("cannot generate signed URL for non-S3 file ({})", self.source()),
            )
        })
    }

    // -----------------------------------------------------------------------
    // Metadata mutation
    // -----------------------------------------------------------------------

    /// Shallow-merge `updates` into the metadata. Content and source are
    /// not affected.
    pub fn set_metadata(&mut self, updates: MetadataHint) {
        self.metadata.merge(updates);
    }

    /// Returns a JSON representation of the file's source and metadata.
    pub fn to_json(&self) -> String {
        #[derive(serde::Serialize)]
        struct FileRepr<'a> {
            source: FileSource,
            #[serde(flatten)]
            metadata: &'a Metadata,
        }
        let repr = FileRepr {
            source: self.source(),
            metadata: &self.metadata,
        };
        serde_json::to_string(&repr).unwrap_or_default()
    }
}

/// GET an object and resolve its metadata.
async fn fetch_object(
    storage: &dyn ObjectStorage,
    location: &S3Location,
    hint: Option<&MetadataHint>,
) -> Result<(Metadata, Bytes)> {
    let response = storage.get_object(&location.bucket, &location.key).await?;
    let url = location.to_string();
    let data = response.body;

    let metadata = resolve(
        FileSource::S3,
        hint,
        &Signals {
            transport: Some(&response.signals),
            url: Some(&url),
            content: Some(&data[..]),
            content_len: Some(data.len() as u64),
            ..Default::default()
        },
    );
    Ok((metadata, data))
}

/// True when both paths name the same existing file, however they are spelled.
async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("source", &self.source())
            .field("metadata", &self.metadata)
            .field("data_len", &self.content.get().map(Bytes::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_bytes_basic() {
        let file = File::from_bytes(Bytes::from("hello world"), None).await.unwrap();
        assert_eq!(file.source(), FileSource::Bytes);
        assert_eq!(file.size(), Some(11));
        assert!(file.path().is_none());
        assert!(file.url().is_none());
        assert!(file.is_resident());
    }

    #[tokio::test]
    async fn test_checksum() {
        let file = File::from_bytes(Bytes::from(vec![0u8; 8]), None).await.unwrap();
        let checksum = file.checksum().await.unwrap();
        // Known SHA-256 of 8 zero bytes
        assert_eq!(
            checksum,
            "af5570f5a1810b7af78caf4bc70a660f0df51e42baf91d4de5b2328de0e83dfc"
        );
    }

    #[tokio::test]
    async fn test_local_path_rejects_other_sources() {
        let file = File::from_bytes(Bytes::from("x"), None).await.unwrap();
        let err = file.local_path("append").unwrap_err();
        assert!(err.is_invalid_source());
        assert_eq!(err.operation(), "append");
    }

    #[tokio::test]
    async fn test_s3_location_from_metadata_url() {
        let mut file = File::from_bytes(Bytes::from("x"), None).await.unwrap();
        assert!(file.s3_location().is_none());
        file.set_metadata(Metadata {
            url: Some("s3://bucket/a/b.txt".to_string()),
            ..Default::default()
        });
        assert_eq!(file.s3_location(), Some(S3Location::new("bucket", "a/b.txt")));
    }

    #[tokio::test]
    async fn test_refresh_rejects_in_memory_sources() {
        let mut file = File::from_bytes(Bytes::from("x"), None).await.unwrap();
        assert!(file.refresh().await.unwrap_err().is_invalid_source());
    }

    #[tokio::test]
    async fn test_debug_shows_data_len() {
        let file = File::from_bytes(Bytes::from("content"), None).await.unwrap();
        let debug = format!("{:?}", file);
        assert!(debug.contains("File"));
        assert!(debug.contains("Bytes"));
        assert!(debug.contains("data_len: Some(7)"));
    }
}
