use super::error::MessageError;
use super::layout::{self, FieldSpec};
use crate::text::escape_bytes;

/// Bounds-checked cursor over a decoded message buffer.
pub struct MessageReader<'a> {
    payload: &'a [u8],
    offset: usize,
}

impl<'a> MessageReader<'a> {
    /// Starts reading just past the marker byte.
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            offset: layout::MARKER_OFFSET + 1,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn read_marker(&self) -> Option<u8> {
        self.payload.get(layout::MARKER_OFFSET).copied()
    }

    /// Takes the next `spec.len` bytes, or fails without consuming anything.
    pub fn next_field(&mut self, spec: &FieldSpec) -> Result<&'a [u8], MessageError> {
        debug_assert_eq!(self.offset, spec.offset, "{} read out of order", spec.name);
        let bytes = self.payload.get(spec.range()).ok_or(MessageError::TooShort {
            field: spec.name,
            needed: spec.end(),
            actual: self.payload.len(),
        })?;
        self.offset = spec.end();
        Ok(bytes)
    }

    /// Everything after the current offset.
    pub fn rest(&self) -> &'a [u8] {
        self.payload.get(self.offset..).unwrap_or(&[])
    }
}

/// Decodes printable ASCII; any other byte turns the whole field into hex escapes.
///
/// Returns the text and whether the bytes decoded cleanly.
pub fn read_ascii(bytes: &[u8]) -> (String, bool) {
    if bytes.iter().all(|b| is_printable_ascii(*b)) {
        let text = bytes.iter().map(|b| char::from(*b)).collect();
        (text, true)
    } else {
        (escape_bytes(bytes), false)
    }
}

pub fn is_printable_ascii(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}
