//! Content-Disposition header parsing.
//!
//! Extracts the filename from HTTP Content-Disposition headers following
//! RFC 6266, including the RFC 5987 `filename*=charset'lang'value` form,
//! and builds the header value used when uploading.

/// Parsed content disposition data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// The disposition type (e.g., "attachment", "inline"), lowercased.
    /// `None` when the header starts directly with a parameter.
    pub disposition_type: Option<String>,
    /// The filename parameter, if present. `filename*` wins over `filename`.
    pub filename: Option<String>,
}

/// Parse a Content-Disposition header value.
///
/// Supports forms like:
/// - `attachment; filename="example.txt"`
/// - `attachment; filename=example.txt`
/// - `inline; filename="example.txt"`
/// - `attachment; filename*=UTF-8''example%20file.txt` (RFC 5987)
///
/// Never fails: a header without a usable filename yields `filename: None`.
pub fn parse_content_disposition(header: &str) -> ContentDisposition {
    let mut disposition_type = None;
    let mut filename: Option<String> = None;
    let mut filename_star: Option<String> = None;

    for (i, segment) in header.split(';').map(str::trim).enumerate() {
        if segment.is_empty() {
            continue;
        }

        let Some((key, value)) = segment.split_once('=') else {
            if i == 0 {
                disposition_type = Some(segment.to_ascii_lowercase());
            }
            continue;
        };

        let value = unquote(value.trim());
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => filename = Some(value.to_string()),
            "filename*" => {
                // charset'lang'pct-encoded: everything after the last quote
                let encoded = value.rsplit_once('\'').map_or(value, |(_, v)| v);
                filename_star = Some(percent_decode(encoded));
            }
            _ => {}
        }
    }

    ContentDisposition {
        disposition_type,
        filename: filename_star.or(filename).filter(|f| !f.is_empty()),
    }
}

/// Shorthand for the filename alone.
pub fn filename_from_header(header: &str) -> Option<String> {
    parse_content_disposition(header).filename
}

/// Builds an `attachment` header value for `name`.
///
/// Plain ASCII names get a quoted `filename`; anything else also gets an
/// RFC 5987 `filename*` so it survives header encoding.
pub fn attachment_header(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\'));
    if plain {
        return format!("attachment; filename=\"{name}\"");
    }

    let fallback: String = name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(name)
    )
}

/// Remove surrounding double quotes from a string.
fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Best-effort percent-decoding: malformed escapes pass through untouched.
pub(crate) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
