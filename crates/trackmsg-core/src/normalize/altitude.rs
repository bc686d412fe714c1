use serde::{Deserialize, Serialize};

use crate::config::Locale;

const MAX_INTEGER_DIGITS: usize = 5;

/// Altitude in display form.
///
/// # Examples
/// ```
/// use trackmsg_core::{Locale, normalize_altitude};
///
/// let alt = normalize_altitude("-00010.2", "m", Locale::En);
/// assert_eq!(alt.display, "-10.2 m");
/// assert_eq!(alt.meters, Some(-10.2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAltitude {
    /// Fixed-point text as received.
    pub raw: String,
    /// Signed display string with unit suffix, or the annotated raw text.
    pub display: String,
    /// Altitude in meters, absent when `raw` is malformed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meters: Option<f64>,
}

pub fn normalize_altitude(raw: &str, unit: &str, locale: Locale) -> NormalizedAltitude {
    let Some(tenths) = parse_tenths(raw) else {
        return NormalizedAltitude {
            raw: raw.to_string(),
            display: format!("{raw} {}", locale.malformed_note()),
            meters: None,
        };
    };

    let sign = if tenths < 0 { '-' } else { '+' };
    let magnitude = tenths.unsigned_abs();
    let mut display = format!("{sign}{}.{}", magnitude / 10, magnitude % 10);
    if !unit.is_empty() {
        display.push(' ');
        display.push_str(unit);
    }

    NormalizedAltitude {
        raw: raw.to_string(),
        display,
        meters: Some(tenths as f64 / 10.0),
    }
}

/// Matches `[+-]D{1,5}.D` and returns the value in tenths.
fn parse_tenths(raw: &str) -> Option<i64> {
    let (negative, unsigned) = match raw.as_bytes().first().copied()? {
        b'-' => (true, raw.get(1..)?),
        b'+' => (false, raw.get(1..)?),
        _ => (false, raw),
    };
    let (whole, fraction) = unsigned.split_once('.')?;
    if whole.is_empty() || whole.len() > MAX_INTEGER_DIGITS || fraction.len() != 1 {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let fraction: i64 = fraction.parse().ok()?;
    let tenths = whole * 10 + fraction;
    Some(if negative { -tenths } else { tenths })
}
