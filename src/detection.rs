//! MIME type and file extension detection.
//!
//! Two independent tools live here:
//! - a content classifier ([`classify`]) that looks only at bytes: the
//!   `infer` crate's magic signatures, then SVG/HTML/XML text sniffing;
//! - the extension/MIME table ([`mime_from_extension`], [`extension_from_mime`]),
//!   backed by `mime_guess`.

use std::path::Path;

/// How many leading bytes the classifier needs to see.
pub const CLASSIFY_PREFIX_LEN: usize = 8192;

/// The generic "could be anything" type. Never counts as a classification.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A confident content-based classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The detected MIME type (e.g., "image/png").
    pub mime_type: String,
    /// The detected file extension without dot (e.g., "png").
    pub extension: String,
}

impl Classification {
    fn new(mime_type: &str, extension: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            extension: extension.to_string(),
        }
    }
}

/// Classify content from its leading bytes.
///
/// Returns `None` when nothing confident can be said, including when the
/// only candidate is `application/octet-stream`.
pub fn classify(bytes: &[u8]) -> Option<Classification> {
    if bytes.is_empty() {
        return None;
    }
    let bytes = &bytes[..bytes.len().min(CLASSIFY_PREFIX_LEN)];

    if let Some(kind) = infer::get(bytes) {
        let mime = kind.mime_type();
        // infer only knows "xml"; the text sniffer can tell SVG apart.
        if mime == "text/xml" || mime == "application/xml" {
            if let Some(result) = sniff_markup(bytes) {
                return Some(result);
            }
        }
        if !is_generic_mime(mime) && !kind.extension().is_empty() {
            return Some(Classification::new(mime, kind.extension()));
        }
    }

    sniff_markup(bytes)
}

/// True for types that carry no information about the content.
pub fn is_generic_mime(mime: &str) -> bool {
    let essence = essence(mime);
    essence.is_empty() || essence.eq_ignore_ascii_case(OCTET_STREAM)
}

/// The `type/subtype` part of a MIME type, without parameters.
pub fn essence(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}

/// Look up the MIME type for an extension (without dot).
pub fn mime_from_extension(ext: &str) -> Option<String> {
    mime_guess::from_ext(ext).first().map(|m| m.to_string())
}

/// Look up the MIME type for a file name by its extension.
pub fn mime_from_filename(filename: &str) -> Option<String> {
    mime_guess::from_path(filename).first().map(|m| m.to_string())
}

/// Look up an extension for a MIME type. Parameters are ignored.
///
/// The table often lists several extensions per type (`text/plain` has
/// dozens); `preferred` is returned when it is one of them.
pub fn extension_from_mime(mime: &str, preferred: Option<&str>) -> Option<String> {
    let essence = essence(mime).to_ascii_lowercase();
    let extensions = mime_guess::get_mime_extensions_str(&essence)?;

    if let Some(preferred) = preferred {
        if let Some(hit) = extensions.iter().find(|e| e.eq_ignore_ascii_case(preferred)) {
            return Some(hit.to_string());
        }
    }
    extensions.first().map(|e| e.to_string())
}

/// The part of a file name after its last dot.
pub fn extension_from_filename(filename: &str) -> Option<String> {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
}

/// Text-level detection for SVG, HTML and XML documents.
fn sniff_markup(bytes: &[u8]) -> Option<Classification> {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        // The prefix cut may land inside a multi-byte character.
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()?,
        Err(_) => return None,
    };

    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let lower: String = trimmed.chars().take(512).collect::<String>().to_ascii_lowercase();

    if lower.starts_with("<svg") || (lower.starts_with("<?xml") && trimmed.contains("<svg")) {
        return Some(Classification::new("image/svg+xml", "svg"));
    }
    if lower.starts_with("<!doctype html") || lower.starts_with("<html") {
        return Some(Classification::new("text/html", "html"));
    }
    if lower.starts_with("<?xml") || lower.starts_with("<!doctype") {
        return Some(Classification::new("application/xml", "xml"));
    }

    None
}
