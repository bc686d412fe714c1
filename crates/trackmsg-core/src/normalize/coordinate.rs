use serde::{Deserialize, Serialize};

use crate::config::Locale;
use crate::message::layout::{self, FieldName};

const FRACTION_DIGITS: usize = 5;
const MINUTE_DIGITS: usize = 2;

/// Latitude or longitude; decides degree width and accepted hemisphere letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn degree_digits(self) -> usize {
        match self {
            Axis::Latitude => 2,
            Axis::Longitude => 3,
        }
    }

    pub fn hemispheres(self) -> [char; 2] {
        match self {
            Axis::Latitude => layout::LAT_HEMISPHERES,
            Axis::Longitude => layout::LON_HEMISPHERES,
        }
    }

    pub fn hemispheres_label(self) -> &'static str {
        match self {
            Axis::Latitude => layout::LAT_HEMISPHERES_LABEL,
            Axis::Longitude => layout::LON_HEMISPHERES_LABEL,
        }
    }

    pub fn hemisphere_field(self) -> FieldName {
        match self {
            Axis::Latitude => FieldName::LatHemisphere,
            Axis::Longitude => FieldName::LonHemisphere,
        }
    }

    pub fn value_field(self) -> FieldName {
        match self {
            Axis::Latitude => FieldName::LatValue,
            Axis::Longitude => FieldName::LonValue,
        }
    }
}

/// A coordinate in display and decimal-degree form.
///
/// # Examples
/// ```
/// use trackmsg_core::{Axis, Locale, normalize_coordinate};
///
/// let lat = normalize_coordinate(Axis::Latitude, "N", "4005.76783", Locale::En);
/// assert_eq!(lat.decimal, Some(40.096130));
/// assert_eq!(lat.display, "North 40°05.76783'");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCoordinate {
    /// Hemisphere letter as received.
    pub hemisphere: String,
    /// Degree-minute text as received.
    pub raw: String,
    /// Localized display string.
    pub display: String,
    /// Signed decimal degrees, absent when `raw` is malformed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal: Option<f64>,
}

struct DegreeMinutes<'a> {
    degrees_text: &'a str,
    minutes_text: &'a str,
    degrees: u64,
    /// Minutes in units of 1e-5.
    minutes_e5: u64,
}

pub fn normalize_coordinate(
    axis: Axis,
    hemisphere: &str,
    raw: &str,
    locale: Locale,
) -> NormalizedCoordinate {
    let Some(parts) = split_degree_minutes(raw, axis.degree_digits()) else {
        return NormalizedCoordinate {
            hemisphere: hemisphere.to_string(),
            raw: raw.to_string(),
            display: format!("{hemisphere}{raw} {}", locale.malformed_note()),
            decimal: None,
        };
    };

    let name = locale.hemisphere_name(hemisphere).unwrap_or(hemisphere);
    let negative = matches!(hemisphere, "S" | "W");
    NormalizedCoordinate {
        hemisphere: hemisphere.to_string(),
        raw: raw.to_string(),
        display: format!("{name}{}°{}'", parts.degrees_text, parts.minutes_text),
        decimal: Some(to_decimal(&parts, negative)),
    }
}

/// Matches `<degrees><MM>.<MMMMM>` with a fixed degree width.
fn split_degree_minutes(raw: &str, degree_digits: usize) -> Option<DegreeMinutes<'_>> {
    let (whole, fraction) = raw.split_once('.')?;
    if whole.len() != degree_digits + MINUTE_DIGITS || fraction.len() != FRACTION_DIGITS {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let degrees_text = whole.get(..degree_digits)?;
    let minutes_text = raw.get(degree_digits..)?;
    let degrees = degrees_text.parse().ok()?;
    let whole_minutes: u64 = whole.get(degree_digits..)?.parse().ok()?;
    let fraction: u64 = fraction.parse().ok()?;

    Some(DegreeMinutes {
        degrees_text,
        minutes_text,
        degrees,
        minutes_e5: whole_minutes * 100_000 + fraction,
    })
}

/// Degrees plus minutes/60, rounded half-to-even at the sixth decimal place.
///
/// The arithmetic is done in micro-degrees so the rounding is exact:
/// `minutes_e5 * 1e-5 / 60` degrees is `minutes_e5 / 6` micro-degrees.
fn to_decimal(parts: &DegreeMinutes<'_>, negative: bool) -> f64 {
    let mut micro_minutes = parts.minutes_e5 / 6;
    let remainder = parts.minutes_e5 % 6;
    if remainder > 3 || (remainder == 3 && micro_minutes % 2 == 1) {
        micro_minutes += 1;
    }
    let micro = parts.degrees * 1_000_000 + micro_minutes;
    let value = micro as f64 / 1_000_000.0;
    if negative && micro != 0 { -value } else { value }
}
