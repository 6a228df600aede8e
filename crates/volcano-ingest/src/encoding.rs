//! Text decoding for source files.
//!
//! Archive downloads are latin-1; registry exports are usually UTF-8. Valid
//! UTF-8 is used as-is, anything else is decoded as windows-1252 (the WHATWG
//! mapping of the `latin1` label).

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

/// Decodes file bytes to text, stripping a UTF-8 byte order mark.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                tracing::debug!("replacement characters inserted while decoding latin-1 text");
            }
            text
        }
    }
}
