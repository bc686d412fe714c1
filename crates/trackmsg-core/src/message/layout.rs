use std::fmt;

use serde::{Deserialize, Serialize};

pub const MARKER_OFFSET: usize = 0;
pub const MARKER: u8 = 0xA4;
pub const SEPARATOR: u8 = b'-';

pub const LAT_HEMISPHERES: [char; 2] = ['N', 'S'];
pub const LON_HEMISPHERES: [char; 2] = ['E', 'W'];
pub const LAT_HEMISPHERES_LABEL: &str = "N/S";
pub const LON_HEMISPHERES_LABEL: &str = "E/W";

/// Named fixed-size fields of the wire format, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Timestamp,
    LatHemisphere,
    LatValue,
    LonHemisphere,
    LonValue,
    Altitude,
    Separator,
}

impl FieldName {
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Timestamp => "timestamp",
            FieldName::LatHemisphere => "latitude hemisphere",
            FieldName::LatValue => "latitude value",
            FieldName::LonHemisphere => "longitude hemisphere",
            FieldName::LonValue => "longitude value",
            FieldName::Altitude => "altitude",
            FieldName::Separator => "separator",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the bytes of a fixed field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared numerically, never decoded as text.
    RawByte,
    /// Printable ASCII; anything else is escaped and reported.
    Ascii,
}

/// One row of the wire table. Offsets are derived from the previous row, so
/// widths are the only numbers written down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub offset: usize,
    pub len: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn after_marker(name: FieldName, len: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset: MARKER_OFFSET + 1,
            len,
            kind,
        }
    }

    const fn then(self, name: FieldName, len: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset: self.end(),
            len,
            kind,
        }
    }

    pub const fn end(self) -> usize {
        self.offset + self.len
    }

    pub fn range(self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}

pub const TIMESTAMP: FieldSpec = FieldSpec::after_marker(FieldName::Timestamp, 8, FieldKind::Ascii);
pub const LAT_HEMISPHERE: FieldSpec = TIMESTAMP.then(FieldName::LatHemisphere, 1, FieldKind::Ascii);
pub const LAT_VALUE: FieldSpec = LAT_HEMISPHERE.then(FieldName::LatValue, 10, FieldKind::Ascii);
pub const LON_HEMISPHERE: FieldSpec = LAT_VALUE.then(FieldName::LonHemisphere, 1, FieldKind::Ascii);
pub const LON_VALUE: FieldSpec = LON_HEMISPHERE.then(FieldName::LonValue, 11, FieldKind::Ascii);
pub const ALTITUDE: FieldSpec = LON_VALUE.then(FieldName::Altitude, 8, FieldKind::Ascii);
pub const SEPARATOR_FIELD: FieldSpec = ALTITUDE.then(FieldName::Separator, 1, FieldKind::RawByte);

/// Start of the free-form text, which runs to the end of the buffer. This is
/// also the minimum length of a message carrying every fixed field.
pub const TEXT_OFFSET: usize = SEPARATOR_FIELD.end();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_match_wire_table() {
        assert_eq!(TIMESTAMP.range(), 1..9);
        assert_eq!(LAT_HEMISPHERE.range(), 9..10);
        assert_eq!(LAT_VALUE.range(), 10..20);
        assert_eq!(LON_HEMISPHERE.range(), 20..21);
        assert_eq!(LON_VALUE.range(), 21..32);
        assert_eq!(ALTITUDE.range(), 32..40);
        assert_eq!(SEPARATOR_FIELD.range(), 40..41);
        assert_eq!(TEXT_OFFSET, 41);
    }

    #[test]
    fn field_labels_are_human_readable() {
        assert_eq!(FieldName::LatValue.to_string(), "latitude value");
        assert_eq!(FieldName::Separator.to_string(), "separator");
    }
}
