//! Best-effort decoding of the free-form trailing segment.
//!
//! The segment carries no length or encoding hint. Decoding is a single greedy
//! pass: a GBK double-byte character is preferred, then a printable ASCII byte,
//! and anything else becomes a `[XX]` escape. Escapes are for display only and
//! do not round-trip.

use std::fmt::Write;

use encoding_rs::GBK;

use crate::message::reader::is_printable_ascii;

/// Output of [`decode_mixed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Number of bytes rendered as `[XX]` escapes.
    pub escapes: usize,
}

/// Decodes `bytes` without ever failing.
///
/// # Examples
/// ```
/// use trackmsg_core::decode_mixed;
///
/// let decoded = decode_mixed(&[0xC4, 0xE3, 0xBA, 0xC3, b'!', 0x07]);
/// assert_eq!(decoded.text, "你好![07]");
/// assert_eq!(decoded.escapes, 1);
/// ```
pub fn decode_mixed(bytes: &[u8]) -> DecodedText {
    let mut text = String::with_capacity(bytes.len());
    let mut escapes = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if let Some(ch) = bytes.get(pos..pos + 2).and_then(decode_double_byte) {
            text.push(ch);
            pos += 2;
            continue;
        }

        let byte = bytes[pos];
        if is_printable_ascii(byte) {
            text.push(char::from(byte));
        } else {
            push_escape(&mut text, byte);
            escapes += 1;
        }
        pos += 1;
    }

    DecodedText { text, escapes }
}

/// Renders every byte as a `[XX]` escape.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for byte in bytes {
        push_escape(&mut out, *byte);
    }
    out
}

fn push_escape(out: &mut String, byte: u8) {
    // Writing into a String cannot fail.
    let _ = write!(out, "[{byte:02X}]");
}

/// A pair only counts when it is a real double-byte character, not two
/// single-byte ones that GBK also happens to accept. The user-defined areas
/// map to private-use code points and are treated as undecodable.
fn decode_double_byte(pair: &[u8]) -> Option<char> {
    let lead = *pair.first()?;
    if !(0x81..=0xFE).contains(&lead) {
        return None;
    }
    let decoded = GBK.decode_without_bom_handling_and_without_replacement(pair)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !is_private_use(ch) => Some(ch),
        _ => None,
    }
}

fn is_private_use(ch: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&ch)
}
