//! Integration tests for content classification and the MIME table.

use anyfile::detection::{
    classify, extension_from_filename, extension_from_mime, is_generic_mime, mime_from_extension,
    mime_from_filename, CLASSIFY_PREFIX_LEN,
};

fn classified(bytes: &[u8]) -> Option<(String, String)> {
    classify(bytes).map(|c| (c.mime_type, c.extension))
}

fn pair(mime: &str, ext: &str) -> Option<(String, String)> {
    Some((mime.to_string(), ext.to_string()))
}

#[test]
fn test_classify_png_magic_bytes() {
    let png_header: Vec<u8> = vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // IHDR chunk
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    ];
    assert_eq!(classified(&png_header), pair("image/png", "png"));
}

#[test]
fn test_classify_jpeg_magic_bytes() {
    let mut jpeg_header = vec![0xFF, 0xD8, 0xFF, 0xE0];
    jpeg_header.extend_from_slice(&[0; 100]);
    assert_eq!(classified(&jpeg_header), pair("image/jpeg", "jpg"));
}

#[test]
fn test_classify_pdf_magic_bytes() {
    assert_eq!(
        classified(b"%PDF-1.7 some content follows"),
        pair("application/pdf", "pdf")
    );
}

#[test]
fn test_classify_gif_magic_bytes() {
    // Minimal GIF89a
    let gif_bytes: Vec<u8> = vec![
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, // GIF89a
        0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, // logical screen descriptor
        0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, // global color table
        0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, // graphic control extension
        0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // image descriptor
        0x02, 0x02, 0x44, 0x01, 0x00, // image data
        0x3B, // trailer
    ];
    assert_eq!(classified(&gif_bytes), pair("image/gif", "gif"));
}

#[test]
fn test_classify_zip_magic_bytes() {
    let mut zip_bytes = vec![0x50, 0x4B, 0x03, 0x04];
    zip_bytes.extend_from_slice(&[0; 100]);
    assert_eq!(classified(&zip_bytes), pair("application/zip", "zip"));
}

#[test]
fn test_classify_webp_magic_bytes() {
    // RIFF....WEBP
    let mut webp_bytes = vec![
        0x52, 0x49, 0x46, 0x46, // RIFF
        0x00, 0x00, 0x00, 0x00, // size placeholder
        0x57, 0x45, 0x42, 0x50, // WEBP
    ];
    webp_bytes.extend_from_slice(&[0; 100]);
    assert_eq!(classified(&webp_bytes), pair("image/webp", "webp"));
}

#[test]
fn test_classify_svg() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><circle cx="50" cy="50" r="40"/></svg>"#;
    assert_eq!(classified(svg), pair("image/svg+xml", "svg"));
}

#[test]
fn test_classify_svg_with_xml_declaration() {
    let svg = br#"<?xml version="1.0" encoding="UTF-8"?><svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#;
    assert_eq!(classified(svg), pair("image/svg+xml", "svg"));
}

#[test]
fn test_classify_xml() {
    let xml = br#"<?xml version="1.0" encoding="UTF-8"?><root><item>data</item></root>"#;
    assert_eq!(classified(xml), pair("application/xml", "xml"));
}

#[test]
fn test_classify_html() {
    let html = b"<!DOCTYPE html><html><head><title>Test</title></head><body></body></html>";
    assert_eq!(classified(html), pair("text/html", "html"));
}

#[test]
fn test_classify_html_after_bom_and_whitespace() {
    let html = "\u{feff}\n  <HTML><body>hi</body></HTML>";
    assert_eq!(classified(html.as_bytes()), pair("text/html", "html"));
}

#[test]
fn test_classify_plain_text_is_inconclusive() {
    assert_eq!(classified(b"just some text data that cannot be detected"), None);
    assert_eq!(classified(b""), None);
}

#[test]
fn test_classify_only_looks_at_prefix() {
    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(CLASSIFY_PREFIX_LEN * 3, b'x');
    assert_eq!(classified(&content), pair("application/pdf", "pdf"));
}

#[test]
fn test_classify_truncated_utf8_in_prefix() {
    // A multi-byte character straddles the prefix boundary.
    let mut content = b"<html>".to_vec();
    content.resize(CLASSIFY_PREFIX_LEN - 1, b' ');
    content.extend_from_slice("\u{e9}".as_bytes());
    assert_eq!(classified(&content), pair("text/html", "html"));
}

#[test]
fn test_generic_mime() {
    assert!(is_generic_mime("application/octet-stream"));
    assert!(is_generic_mime("Application/Octet-Stream; charset=binary"));
    assert!(is_generic_mime(""));
    assert!(!is_generic_mime("text/plain"));
}

#[test]
fn test_mime_from_filename() {
    assert_eq!(mime_from_filename("report.pdf").as_deref(), Some("application/pdf"));
    assert_eq!(mime_from_filename("styles.css").as_deref(), Some("text/css"));
    assert_eq!(mime_from_filename("readme.md").as_deref(), Some("text/markdown"));
    assert_eq!(
        mime_from_filename("document.docx").as_deref(),
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    );
    assert!(mime_from_filename("no_extension").is_none());
}

#[test]
fn test_mime_from_extension_known() {
    assert_eq!(mime_from_extension("png").as_deref(), Some("image/png"));
    assert_eq!(mime_from_extension("html").as_deref(), Some("text/html"));
    assert_eq!(mime_from_extension("pdf").as_deref(), Some("application/pdf"));
    assert_eq!(mime_from_extension("json").as_deref(), Some("application/json"));
}

#[test]
fn test_extension_from_mime_known() {
    assert_eq!(extension_from_mime("image/png", None).as_deref(), Some("png"));
    assert_eq!(extension_from_mime("application/pdf", None).as_deref(), Some("pdf"));
}

#[test]
fn test_extension_from_mime_ignores_parameters() {
    assert_eq!(
        extension_from_mime("text/csv; charset=utf-8", None).as_deref(),
        Some("csv")
    );
}

#[test]
fn test_extension_from_mime_prefers_known_name_suffix() {
    assert_eq!(extension_from_mime("text/plain", Some("txt")).as_deref(), Some("txt"));
    assert_eq!(extension_from_mime("image/jpeg", Some("jpeg")).as_deref(), Some("jpeg"));
    // A suffix the table doesn't list for the type is not taken.
    assert_ne!(extension_from_mime("image/png", Some("txt")).as_deref(), Some("txt"));
}

#[test]
fn test_extension_from_mime_unknown() {
    assert!(extension_from_mime("application/x-unknown-type-12345", None).is_none());
}

#[test]
fn test_extension_from_filename() {
    assert_eq!(extension_from_filename("archive.tar.gz").as_deref(), Some("gz"));
    assert_eq!(extension_from_filename("dir.d/plain").as_deref(), None);
    assert_eq!(extension_from_filename("trailing.").as_deref(), None);
}
