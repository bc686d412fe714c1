//! Parse orchestration: hex text in, tri-state outcome out.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DecoderConfig;
use crate::message::{DecodedField, MessageError, decode_hex, slice_message};
use crate::normalize::{
    Axis, NormalizedAltitude, NormalizedCoordinate, normalize_altitude, normalize_coordinate,
};
use crate::text::decode_mixed;
use crate::warning::{ParseWarning, WarningEntry};

/// Overall classification of a parse.
///
/// Presentation layers treat `SuccessWithWarnings` with the same severity as
/// an error; it must not be collapsed into `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Success,
    SuccessWithWarnings,
    Fatal,
}

/// Every fixed field in raw and normalized form plus the free-form text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFields {
    /// Leading marker byte, absent only for an empty buffer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<u8>,
    pub timestamp: DecodedField,
    pub latitude: NormalizedCoordinate,
    pub longitude: NormalizedCoordinate,
    pub altitude: NormalizedAltitude,
    pub separator: u8,
    /// Fixed text fields as sliced, in wire order.
    pub raw: Vec<DecodedField>,
    /// Decoded free-form text, possibly empty.
    pub text: String,
    /// Free-form bytes as uppercase hex.
    pub text_hex: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub fields: MessageFields,
    /// Anomalies in the order they were found.
    pub warnings: Vec<ParseWarning>,
}

/// Result of decoding one message. A `Decoded` outcome always has every fixed field.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Decoded(DecodedMessage),
    Fatal(MessageError),
}

impl ParseOutcome {
    pub fn status(&self) -> ParseStatus {
        match self {
            ParseOutcome::Decoded(message) if message.warnings.is_empty() => ParseStatus::Success,
            ParseOutcome::Decoded(_) => ParseStatus::SuccessWithWarnings,
            ParseOutcome::Fatal(_) => ParseStatus::Fatal,
        }
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        match self {
            ParseOutcome::Decoded(message) => &message.warnings,
            ParseOutcome::Fatal(_) => &[],
        }
    }

    pub fn to_record(&self) -> MessageRecord {
        match self {
            ParseOutcome::Decoded(message) => MessageRecord {
                status: self.status(),
                error: None,
                warnings: message.warnings.iter().map(ParseWarning::to_entry).collect(),
                fields: Some(message.fields.clone()),
            },
            ParseOutcome::Fatal(error) => MessageRecord {
                status: ParseStatus::Fatal,
                error: Some(error.to_string()),
                warnings: Vec::new(),
                fields: None,
            },
        }
    }
}

/// Serializable result handed to storage and presentation.
///
/// # Examples
/// ```
/// use trackmsg_core::{ParseStatus, decode_hex_message};
///
/// let record = decode_hex_message("A4").to_record();
/// assert_eq!(record.status, ParseStatus::Fatal);
/// assert!(record.fields.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub status: ParseStatus,
    /// Fatal reason, only for `fatal`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<MessageFields>,
}

/// Decodes a hex message with the default configuration.
///
/// # Examples
/// ```
/// use trackmsg_core::{ParseStatus, decode_hex_message};
///
/// let hex = "A430383A31353A34324E343030352E3736373833453131363233\
///            2E31323334352B30303039392E352D4F4B";
/// let outcome = decode_hex_message(hex);
/// assert_eq!(outcome.status(), ParseStatus::Success);
/// ```
pub fn decode_hex_message(hex: &str) -> ParseOutcome {
    decode_hex_message_with(hex, &DecoderConfig::default())
}

pub fn decode_hex_message_with(hex: &str, config: &DecoderConfig) -> ParseOutcome {
    match decode_hex(hex) {
        Ok(payload) => decode_bytes(&payload, config),
        Err(error) => {
            debug!(%error, hex_chars = hex.len(), "message rejected");
            ParseOutcome::Fatal(error)
        }
    }
}

/// Decodes an already hex-decoded buffer.
pub fn decode_bytes(payload: &[u8], config: &DecoderConfig) -> ParseOutcome {
    let mut warnings = Vec::new();
    let sliced = match slice_message(payload, config, &mut warnings) {
        Ok(sliced) => sliced,
        Err(error) => {
            debug!(%error, bytes = payload.len(), "message rejected");
            return ParseOutcome::Fatal(error);
        }
    };

    let latitude = normalize_coordinate(
        Axis::Latitude,
        &sliced.lat_hemisphere.text,
        &sliced.lat_value.text,
        config.locale,
    );
    check_coordinate(&latitude, Axis::Latitude, &mut warnings);
    let longitude = normalize_coordinate(
        Axis::Longitude,
        &sliced.lon_hemisphere.text,
        &sliced.lon_value.text,
        config.locale,
    );
    check_coordinate(&longitude, Axis::Longitude, &mut warnings);

    let altitude = normalize_altitude(&sliced.altitude.text, &config.altitude_unit, config.locale);
    if altitude.meters.is_none() {
        warnings.push(ParseWarning::Altitude {
            raw: altitude.raw.clone(),
        });
    }

    let text = decode_mixed(sliced.text);
    if text.escapes > 0 {
        warnings.push(ParseWarning::TextEscapes {
            count: text.escapes,
        });
    }

    let fields = MessageFields {
        marker: sliced.marker,
        raw: vec![
            sliced.timestamp.clone(),
            sliced.lat_hemisphere,
            sliced.lat_value,
            sliced.lon_hemisphere,
            sliced.lon_value,
            sliced.altitude,
        ],
        timestamp: sliced.timestamp,
        latitude,
        longitude,
        altitude,
        separator: sliced.separator,
        text: text.text,
        text_hex: hex::encode_upper(sliced.text),
    };

    let outcome = ParseOutcome::Decoded(DecodedMessage { fields, warnings });
    debug!(
        status = ?outcome.status(),
        warnings = outcome.warnings().len(),
        bytes = payload.len(),
        "message decoded"
    );
    outcome
}

fn check_coordinate(
    coordinate: &NormalizedCoordinate,
    axis: Axis,
    warnings: &mut Vec<ParseWarning>,
) {
    if coordinate.decimal.is_none() {
        warnings.push(ParseWarning::Coordinate {
            field: axis.value_field(),
            raw: coordinate.raw.clone(),
        });
    }
}
