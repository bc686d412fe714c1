//! Trackmsg core library for decoding hex-encoded position messages.
//!
//! A message is a hex string whose bytes follow a fixed layout (marker,
//! timestamp, latitude, longitude, altitude, separator) followed by free-form
//! text. Decoding runs hex -> field slicing (`message`) -> normalization
//! (`normalize`, `text`) -> a tri-state outcome (`decode`). Everything here is
//! pure: no I/O, no shared state, safe to call from any number of threads.
//!
//! Invariants:
//! - Invalid hex and a buffer too short for a fixed field are the only fatal
//!   conditions; every other anomaly is a warning.
//! - A decoded outcome always carries every fixed field.
//! - The free-form text decoder never fails; undecodable bytes become `[XX]`.
//!
//! # Examples
//! ```
//! use trackmsg_core::{ParseOutcome, ParseStatus, decode_hex_message};
//!
//! let hex = "A430383A31353A34324E343030352E37363738334531313632332E31323334352B30303039392E352D4F4B";
//! let outcome = decode_hex_message(hex);
//! assert_eq!(outcome.status(), ParseStatus::Success);
//! if let ParseOutcome::Decoded(message) = outcome {
//!     assert_eq!(message.fields.latitude.decimal, Some(40.096130));
//!     assert_eq!(message.fields.text, "OK");
//! }
//! ```

use serde::{Deserialize, Serialize};

mod config;
mod decode;
mod envelope;
mod message;
mod normalize;
mod text;
mod warning;

pub use config::{ConfigError, DecoderConfig, Locale};
pub use decode::{
    DecodedMessage, MessageFields, MessageRecord, ParseOutcome, ParseStatus, decode_bytes,
    decode_hex_message, decode_hex_message_with,
};
pub use envelope::{
    DEFAULT_MAX_CONTENT_LEN, Envelope, EnvelopeError, EnvelopeRecord, REQUIRED_FIELDS,
};
pub use message::error::MessageError;
pub use message::layout::FieldName;
pub use message::DecodedField;
pub use normalize::{
    Axis, NormalizedAltitude, NormalizedCoordinate, normalize_altitude, normalize_coordinate,
};
pub use text::{DecodedText, decode_mixed};
pub use warning::{ParseWarning, WarningEntry};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller supplies none.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded records wrapped with tool and input metadata.
///
/// # Examples
/// ```
/// use trackmsg_core::{MessageRecord, make_report};
///
/// let report = make_report::<MessageRecord>("stdin", Vec::new());
/// assert_eq!(report.report_version, trackmsg_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report<T> {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Where the messages came from (argument, file path, envelope path).
    pub source: String,
    /// Records in input order.
    pub records: Vec<T>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use trackmsg_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "trackmsg".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "trackmsg");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "trackmsg").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Build a report with the default timestamp.
pub fn make_report<T>(source: &str, records: Vec<T>) -> Report<T> {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "trackmsg".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        source: source.to_string(),
        records,
    }
}
