use serde::{Deserialize, Serialize};

use super::error::MessageError;
use super::layout::{self, FieldKind, FieldName, FieldSpec};
use super::reader::{MessageReader, read_ascii};
use crate::config::DecoderConfig;
use crate::normalize::Axis;
use crate::warning::ParseWarning;

/// A fixed text field after byte-level decoding.
///
/// # Examples
/// ```
/// use trackmsg_core::{DecodedField, FieldName};
///
/// let field = DecodedField {
///     name: FieldName::Timestamp,
///     text: "08:15:42".to_string(),
///     ok: true,
/// };
/// assert!(field.ok);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedField {
    pub name: FieldName,
    /// Decoded text, or `[XX]` escapes when `ok` is false.
    pub text: String,
    /// Whether every byte was printable ASCII.
    pub ok: bool,
}

/// Every fixed field of a message plus the untouched trailing bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicedMessage<'a> {
    pub marker: Option<u8>,
    pub timestamp: DecodedField,
    pub lat_hemisphere: DecodedField,
    pub lat_value: DecodedField,
    pub lon_hemisphere: DecodedField,
    pub lon_value: DecodedField,
    pub altitude: DecodedField,
    pub separator: u8,
    pub text: &'a [u8],
}

/// Decodes case-insensitive hex into bytes.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, MessageError> {
    hex::decode(input).map_err(MessageError::InvalidHex)
}

/// Walks the wire layout in order.
///
/// A field that does not fit in the buffer is fatal and nothing is returned.
/// Everything else (marker, hemisphere letters, separator, non-ASCII bytes) is
/// appended to `warnings` and slicing continues.
pub fn slice_message<'a>(
    payload: &'a [u8],
    config: &DecoderConfig,
    warnings: &mut Vec<ParseWarning>,
) -> Result<SlicedMessage<'a>, MessageError> {
    let mut reader = MessageReader::new(payload);

    let marker = reader.read_marker();
    match marker {
        None => warnings.push(ParseWarning::MarkerMissing),
        Some(found) if found != config.marker => warnings.push(ParseWarning::Marker {
            expected: config.marker,
            found,
        }),
        Some(_) => {}
    }

    let timestamp = next_text_field(&mut reader, &layout::TIMESTAMP, warnings)?;
    let lat_hemisphere = next_text_field(&mut reader, &layout::LAT_HEMISPHERE, warnings)?;
    check_hemisphere(&lat_hemisphere, Axis::Latitude, warnings);
    let lat_value = next_text_field(&mut reader, &layout::LAT_VALUE, warnings)?;
    let lon_hemisphere = next_text_field(&mut reader, &layout::LON_HEMISPHERE, warnings)?;
    check_hemisphere(&lon_hemisphere, Axis::Longitude, warnings);
    let lon_value = next_text_field(&mut reader, &layout::LON_VALUE, warnings)?;
    let altitude = next_text_field(&mut reader, &layout::ALTITUDE, warnings)?;

    let separator = next_raw_byte(&mut reader, &layout::SEPARATOR_FIELD)?;
    if separator != config.separator {
        warnings.push(ParseWarning::Separator {
            expected: config.separator,
            found: separator,
        });
    }

    debug_assert_eq!(reader.offset(), layout::TEXT_OFFSET);
    Ok(SlicedMessage {
        marker,
        timestamp,
        lat_hemisphere,
        lat_value,
        lon_hemisphere,
        lon_value,
        altitude,
        separator,
        text: reader.rest(),
    })
}

fn next_text_field(
    reader: &mut MessageReader<'_>,
    spec: &FieldSpec,
    warnings: &mut Vec<ParseWarning>,
) -> Result<DecodedField, MessageError> {
    debug_assert_eq!(spec.kind, FieldKind::Ascii);
    let bytes = reader.next_field(spec)?;
    let (text, ok) = read_ascii(bytes);
    if !ok {
        warnings.push(ParseWarning::NonAscii { field: spec.name });
    }
    Ok(DecodedField {
        name: spec.name,
        text,
        ok,
    })
}

fn next_raw_byte(reader: &mut MessageReader<'_>, spec: &FieldSpec) -> Result<u8, MessageError> {
    debug_assert_eq!(spec.kind, FieldKind::RawByte);
    match reader.next_field(spec)? {
        [byte] => Ok(*byte),
        bytes => Err(MessageError::TooShort {
            field: spec.name,
            needed: 1,
            actual: bytes.len(),
        }),
    }
}

fn check_hemisphere(field: &DecodedField, axis: Axis, warnings: &mut Vec<ParseWarning>) {
    let mut chars = field.text.chars();
    let recognized = match (chars.next(), chars.next()) {
        (Some(letter), None) => axis.hemispheres().contains(&letter),
        _ => false,
    };
    if !recognized {
        warnings.push(ParseWarning::Hemisphere {
            field: axis.hemisphere_field(),
            value: field.text.clone(),
            expected: axis.hemispheres_label(),
        });
    }
}
