use std::borrow::Cow;
use std::sync::OnceLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;

// Declarations live in <head>; no need to scan the whole page.
const SNIFF_LIMIT: usize = 4096;

fn meta_charset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9_.:\-]+)"#).expect("static regex")
    })
}

/// Encoding named by a `<meta charset>` or `<meta http-equiv ... charset=>` tag.
pub fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    let caps = meta_charset_re().captures(head)?;
    Encoding::for_label(caps.get(1)?.as_bytes())
}

/// Decode a raw page: declared charset first, then UTF-8, then windows-1252.
pub fn decode_page(bytes: &[u8]) -> Cow<'_, str> {
    match declared_encoding(bytes) {
        Some(enc) if enc != UTF_8 => {
            let (text, _, _) = enc.decode(bytes);
            text
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
        },
    }
}
