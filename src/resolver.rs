//! Metadata resolution.
//!
//! Every constructor gathers whatever signals its source offers and hands
//! them to [`resolve`], which fills each [`Metadata`] field from an ordered
//! list of candidates:
//!
//! | field | candidates, highest priority first |
//! |---|---|
//! | name | local path basename (file source, always) · Content-Disposition · hint · URL basename |
//! | mime_type | content classifier · Content-Type · lookup by name · hint |
//! | size | stat (file source, always) · Content-Length · content length · hint |
//! | extension | content classifier · lookup by resolved type · name suffix · hint |
//! | url | construction context |
//! | path | construction context (file source) |
//! | hash | ETag · Content-MD5 · hint |
//! | last_modified | stat (file source, always) · Last-Modified · hint |
//! | created_at | stat (file source, always) · hint |
//!
//! The classifier outranks declared headers: declared types are often
//! wrong or generic, the bytes are not. A classifier that has nothing
//! confident to say leaves earlier candidates in place.

use std::path::Path;

use chrono::{DateTime, Utc};
use reqwest::header::{self, HeaderMap};

use crate::content_disposition::{filename_from_header, percent_decode};
use crate::detection::{self, Classification};
use crate::metadata::{hinted_size, hinted_str, hinted_time, Metadata, MetadataHint};
use crate::source::{FileSource, S3Location};

/// Descriptive fields reported by whatever protocol delivered the bytes.
///
/// Both HTTP responses and object-storage GET responses are reduced to
/// this shape before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportSignals {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub content_disposition: Option<String>,
    pub etag: Option<String>,
    pub content_md5: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl TransportSignals {
    /// Reads the relevant headers. Names are matched case-insensitively;
    /// unparsable or empty values count as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: header::HeaderName| {
            headers
                .get(&name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            content_type: get(header::CONTENT_TYPE),
            content_length: get(header::CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            content_disposition: get(header::CONTENT_DISPOSITION),
            etag: get(header::ETAG),
            content_md5: get(header::HeaderName::from_static("content-md5")),
            last_modified: get(header::LAST_MODIFIED).and_then(|v| parse_http_date(&v)),
        }
    }
}

/// Parses an HTTP date (RFC 2822 style), falling back to RFC 3339.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The parts of a filesystem `stat` that feed metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStat {
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
}

impl From<&std::fs::Metadata> for FsStat {
    fn from(meta: &std::fs::Metadata) -> Self {
        Self {
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            created: meta.created().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// Everything a constructor knows when it asks for metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct Signals<'a> {
    /// Headers or object-storage response fields.
    pub transport: Option<&'a TransportSignals>,
    /// Filesystem stat, file source only.
    pub stat: Option<&'a FsStat>,
    /// The URL or `s3://` URI the entity was built from.
    pub url: Option<&'a str>,
    /// The local path the entity was built from.
    pub path: Option<&'a Path>,
    /// Leading bytes (or all bytes) of the content.
    pub content: Option<&'a [u8]>,
    /// Total content length when the whole payload is resident.
    pub content_len: Option<u64>,
}

/// Builds the final metadata record for an entity of kind `source`.
pub fn resolve(source: FileSource, hint: Option<&MetadataHint>, signals: &Signals<'_>) -> Metadata {
    let empty = MetadataHint::default();
    let hint = hint.unwrap_or(&empty);
    let transport = signals.transport;
    let stat = signals.stat.filter(|_| source == FileSource::File);

    // Classification has to finish before anything type-related is settled.
    let classified = signals.content.and_then(detection::classify);
    tracing::debug!(?source, ?classified, "content classified");

    let name = resolve_name(source, hint, signals);
    let mime_type = resolve_mime_type(hint, transport, name.as_deref(), classified.as_ref());
    let extension = resolve_extension(hint, name.as_deref(), mime_type.as_deref(), classified.as_ref());

    let size = stat
        .map(|s| s.size)
        .or_else(|| transport.and_then(|t| t.content_length))
        .or(signals.content_len)
        .or_else(|| hinted_size(hint.size));

    let hash = transport
        .and_then(|t| {
            let etag = present(&t.etag).map(|e| e.trim_matches('"')).filter(|e| !e.is_empty());
            etag.or_else(|| present(&t.content_md5))
        })
        .map(str::to_string)
        .or_else(|| hinted_str(&hint.hash).map(str::to_string));

    let last_modified = stat
        .and_then(|s| s.modified)
        .or_else(|| transport.and_then(|t| t.last_modified))
        .or_else(|| hinted_time(hint.last_modified));
    let created_at = stat
        .and_then(|s| s.created)
        .or_else(|| hinted_time(hint.created_at));

    let url = match source {
        FileSource::Url | FileSource::S3 => signals.url.map(str::to_string),
        _ => None,
    };
    let path = match source {
        FileSource::File => signals.path.map(|p| p.to_string_lossy().into_owned()),
        _ => None,
    };

    let metadata = Metadata {
        name,
        mime_type,
        size,
        extension,
        url,
        path,
        hash,
        last_modified,
        created_at,
    };
    tracing::debug!(?source, ?metadata, "metadata resolved");
    metadata
}

fn resolve_name(source: FileSource, hint: &MetadataHint, signals: &Signals<'_>) -> Option<String> {
    if source == FileSource::File {
        if let Some(base) = signals.path.and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
            return Some(base.to_string());
        }
    }

    signals
        .transport
        .and_then(|t| present(&t.content_disposition))
        .and_then(filename_from_header)
        .and_then(|name| base_name(&name))
        .or_else(|| hinted_str(&hint.name).and_then(base_name))
        .or_else(|| signals.url.and_then(filename_from_url))
}

fn resolve_mime_type(
    hint: &MetadataHint,
    transport: Option<&TransportSignals>,
    name: Option<&str>,
    classified: Option<&Classification>,
) -> Option<String> {
    if let Some(c) = classified {
        return Some(c.mime_type.clone());
    }

    transport
        .and_then(|t| present(&t.content_type))
        .map(str::to_string)
        .or_else(|| name.and_then(detection::mime_from_filename))
        .or_else(|| hinted_str(&hint.mime_type).map(str::to_string))
}

fn resolve_extension(
    hint: &MetadataHint,
    name: Option<&str>,
    mime_type: Option<&str>,
    classified: Option<&Classification>,
) -> Option<String> {
    if let Some(c) = classified {
        return Some(c.extension.clone());
    }

    let from_name = name.and_then(detection::extension_from_filename);
    mime_type
        .filter(|m| !detection::is_generic_mime(m))
        .and_then(|m| detection::extension_from_mime(m, from_name.as_deref()))
        .or(from_name)
        .or_else(|| hinted_str(&hint.extension).map(|e| e.trim_start_matches('.').to_string()))
}

/// Transport values arrive from any [`crate::ObjectStorage`] unchecked;
/// blank ones count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The final segment of a suggested file name, split on `/` and `\`.
fn base_name(name: &str) -> Option<String> {
    name.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .map(str::to_string)
}

/// The last path segment of a URL, percent-decoded.
fn filename_from_url(url: &str) -> Option<String> {
    if let Ok(location) = url.parse::<S3Location>() {
        return location.file_name().map(str::to_string);
    }

    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() {
        None
    } else {
        Some(percent_decode(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/path/to/file.txt").as_deref(),
            Some("file.txt")
        );
        assert_eq!(filename_from_url("https://example.com/"), None);
        assert_eq!(
            filename_from_url("https://example.com/image.png?v=1").as_deref(),
            Some("image.png")
        );
        assert_eq!(
            filename_from_url("https://example.com/my%20notes.md").as_deref(),
            Some("my notes.md")
        );
        assert_eq!(filename_from_url("s3://b/dir/k#1.txt").as_deref(), Some("k#1.txt"));
    }

    #[test]
    fn test_signals_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("text/csv"));
        headers.insert("CONTENT-LENGTH", HeaderValue::from_static("42"));
        headers.insert("etag", HeaderValue::from_static("\"abc\""));
        headers.insert("Content-MD5", HeaderValue::from_static("Q2hlY2sgSW50ZWdyaXR5IQ=="));
        headers.insert(
            "last-modified",
            HeaderValue::from_static("Mon, 01 Jan 2024 00:00:00 GMT"),
        );

        let signals = TransportSignals::from_headers(&headers);
        assert_eq!(signals.content_type.as_deref(), Some("text/csv"));
        assert_eq!(signals.content_length, Some(42));
        assert_eq!(signals.etag.as_deref(), Some("\"abc\""));
        assert_eq!(signals.content_md5.as_deref(), Some("Q2hlY2sgSW50ZWdyaXR5IQ=="));
        assert_eq!(
            signals.last_modified,
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .ok()
                .map(|d| d.with_timezone(&Utc))
        );
    }

    #[test]
    fn test_signals_ignore_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("lots"));
        headers.insert("last-modified", HeaderValue::from_static("yesterday"));
        headers.insert("content-type", HeaderValue::from_static(""));
        assert_eq!(TransportSignals::from_headers(&headers), TransportSignals::default());
    }

    #[test]
    fn test_hash_prefers_etag_then_md5() {
        let transport = TransportSignals {
            content_md5: Some("md5".to_string()),
            ..Default::default()
        };
        let signals = Signals {
            transport: Some(&transport),
            ..Default::default()
        };
        let m = resolve(FileSource::Url, None, &signals);
        assert_eq!(m.hash.as_deref(), Some("md5"));

        let transport = TransportSignals {
            etag: Some("\"tag\"".to_string()),
            content_md5: Some("md5".to_string()),
            ..Default::default()
        };
        let signals = Signals {
            transport: Some(&transport),
            ..Default::default()
        };
        let m = resolve(FileSource::Url, None, &signals);
        assert_eq!(m.hash.as_deref(), Some("tag"));
    }

    #[test]
    fn test_octet_stream_header_keeps_name_extension() {
        let transport = TransportSignals {
            content_type: Some("application/octet-stream".to_string()),
            ..Default::default()
        };
        let signals = Signals {
            transport: Some(&transport),
            url: Some("https://example.com/archive.custom"),
            content: Some(b"not a known format"),
            ..Default::default()
        };
        let m = resolve(FileSource::Url, None, &signals);
        assert_eq!(m.mime_type.as_deref(), Some("application/octet-stream"));
        assert_eq!(m.extension.as_deref(), Some("custom"));
        assert_eq!(m.name.as_deref(), Some("archive.custom"));
    }

    #[test]
    fn test_path_and_url_only_for_their_sources() {
        let signals = Signals {
            url: Some("https://example.com/a.txt"),
            path: Some(Path::new("/tmp/a.txt")),
            ..Default::default()
        };
        let m = resolve(FileSource::Bytes, None, &signals);
        assert!(m.url.is_none());
        assert!(m.path.is_none());
    }
}
