//! File metadata types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents metadata about a file including its properties and attributes.
///
/// A field that no source could determine stays `None`; it is never filled
/// with a placeholder like `0` or `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// The file name without any path component (e.g., "example.txt").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The MIME type, possibly with parameters (e.g., "text/plain; charset=utf-8").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// The file size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// The file extension without the dot (e.g., "txt").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// The URL the file was loaded from (HTTP URL or s3:// URI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The local filesystem path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// ETag or Content-MD5 reported by the transport. Not computed from content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// When the file was last modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// When the file was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Creates a new empty Metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge: every field set in `updates` replaces the current value,
    /// every `None` field leaves it alone.
    pub fn merge(&mut self, updates: MetadataHint) {
        fn set<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        set(&mut self.name, updates.name);
        set(&mut self.mime_type, updates.mime_type);
        set(&mut self.size, updates.size);
        set(&mut self.extension, updates.extension);
        set(&mut self.url, updates.url);
        set(&mut self.path, updates.path);
        set(&mut self.hash, updates.hash);
        set(&mut self.last_modified, updates.last_modified);
        set(&mut self.created_at, updates.created_at);
    }
}

/// A partial set of metadata properties supplied by the caller as a
/// lowest-priority seed for resolution.
///
/// A hint field only counts when it carries a real value: empty strings,
/// a zero size and the Unix epoch are treated the same as `None`.
pub type MetadataHint = Metadata;

pub(crate) fn hinted_str(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn hinted_size(field: Option<u64>) -> Option<u64> {
    field.filter(|&n| n > 0)
}

pub(crate) fn hinted_time(field: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    field.filter(|t| *t != DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metadata() {
        let m = Metadata::new();
        assert!(m.name.is_none());
        assert!(m.mime_type.is_none());
        assert!(m.size.is_none());
        assert!(m.extension.is_none());
        assert!(m.url.is_none());
        assert!(m.path.is_none());
        assert!(m.hash.is_none());
        assert!(m.last_modified.is_none());
        assert!(m.created_at.is_none());
    }

    #[test]
    fn test_merge_overwrites_only_provided_fields() {
        let mut m = Metadata {
            name: Some("original.txt".to_string()),
            size: Some(12),
            ..Default::default()
        };
        m.merge(Metadata {
            name: Some("renamed.txt".to_string()),
            mime_type: Some("text/plain".to_string()),
            ..Default::default()
        });
        assert_eq!(m.name.as_deref(), Some("renamed.txt"));
        assert_eq!(m.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(m.size, Some(12));
    }

    #[test]
    fn test_hint_presence_rules() {
        assert_eq!(hinted_str(&Some(String::new())), None);
        assert_eq!(hinted_str(&Some("  ".to_string())), None);
        assert_eq!(hinted_str(&Some("a.txt".to_string())), Some("a.txt"));
        assert_eq!(hinted_size(Some(0)), None);
        assert_eq!(hinted_size(Some(3)), Some(3));
        assert_eq!(hinted_time(Some(DateTime::<Utc>::UNIX_EPOCH)), None);
    }

    #[test]
    fn test_serialize() {
        let m = Metadata {
            name: Some("test.txt".to_string()),
            size: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"name\":\"test.txt\""));
        assert!(json.contains("\"size\":42"));
        assert!(!json.contains("\"url\""));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"name":"test.txt","mime_type":"text/plain","size":100}"#;
        let m: Metadata = serde_json::from_str(json).unwrap();
        assert_eq!(m.name.as_deref(), Some("test.txt"));
        assert_eq!(m.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(m.size, Some(100));
        assert!(m.extension.is_none());
    }
}
