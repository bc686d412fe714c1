use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::layout::FieldName;

/// Field-level anomalies that are recorded but never abort a parse.
///
/// Each variant has a stable identifier (see [`ParseWarning::id`]) so callers
/// can match on it without sniffing the message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("marker not recognized: buffer is empty")]
    MarkerMissing,
    #[error("marker not recognized: expected {expected:#04X}, got {found:#04X}")]
    Marker { expected: u8, found: u8 },
    #[error("{field} '{value}' not recognized, expected {expected}")]
    Hemisphere {
        field: FieldName,
        value: String,
        expected: &'static str,
    },
    #[error("separator not recognized: expected {expected:#04X}, got {found:#04X}")]
    Separator { expected: u8, found: u8 },
    #[error("{field} contains bytes outside printable ASCII")]
    NonAscii { field: FieldName },
    #[error("{field} '{raw}' does not match the degree-minute pattern")]
    Coordinate { field: FieldName, raw: String },
    #[error("altitude '{raw}' does not match the signed fixed-point pattern")]
    Altitude { raw: String },
    #[error("free-form text contains {count} undecodable byte(s)")]
    TextEscapes { count: usize },
}

impl ParseWarning {
    pub fn id(&self) -> &'static str {
        match self {
            ParseWarning::MarkerMissing | ParseWarning::Marker { .. } => "TM-MARKER",
            ParseWarning::Hemisphere { .. } => "TM-HEMISPHERE",
            ParseWarning::Separator { .. } => "TM-SEPARATOR",
            ParseWarning::NonAscii { .. } => "TM-ASCII",
            ParseWarning::Coordinate { .. } => "TM-COORDINATE",
            ParseWarning::Altitude { .. } => "TM-ALTITUDE",
            ParseWarning::TextEscapes { .. } => "TM-TEXT-ESCAPE",
        }
    }

    pub fn to_entry(&self) -> WarningEntry {
        WarningEntry {
            id: self.id().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable form of a [`ParseWarning`].
///
/// # Examples
/// ```
/// use trackmsg_core::WarningEntry;
///
/// let entry = WarningEntry {
///     id: "TM-SEPARATOR".to_string(),
///     message: "separator not recognized: expected 0x2D, got 0x2B".to_string(),
/// };
/// assert_eq!(entry.id, "TM-SEPARATOR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEntry {
    /// Stable warning identifier (e.g., `TM-HEMISPHERE`).
    pub id: String,
    /// Human-readable description.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_message_names_the_anomaly() {
        let warning = ParseWarning::Separator {
            expected: b'-',
            found: 0x2B,
        };
        assert_eq!(warning.id(), "TM-SEPARATOR");
        assert_eq!(
            warning.to_string(),
            "separator not recognized: expected 0x2D, got 0x2B"
        );
    }

    #[test]
    fn hemisphere_message_names_the_field() {
        let warning = ParseWarning::Hemisphere {
            field: FieldName::LatHemisphere,
            value: "X".to_string(),
            expected: "N/S",
        };
        let entry = warning.to_entry();
        assert_eq!(entry.id, "TM-HEMISPHERE");
        assert!(entry.message.contains("latitude hemisphere 'X'"));
    }
}
