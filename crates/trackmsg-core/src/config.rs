use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::layout;

/// Errors returned when loading a [`DecoderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid decoder config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Language used for display strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    /// Full hemisphere name, or `None` for letters outside N/S/E/W.
    pub fn hemisphere_name(self, letter: &str) -> Option<&'static str> {
        let name = match (self, letter) {
            (Locale::Zh, "N") => "北纬",
            (Locale::Zh, "S") => "南纬",
            (Locale::Zh, "E") => "东经",
            (Locale::Zh, "W") => "西经",
            (Locale::En, "N") => "North ",
            (Locale::En, "S") => "South ",
            (Locale::En, "E") => "East ",
            (Locale::En, "W") => "West ",
            _ => return None,
        };
        Some(name)
    }

    pub fn malformed_note(self) -> &'static str {
        match self {
            Locale::Zh => "(格式错误)",
            Locale::En => "(malformed)",
        }
    }
}

/// Decoder settings. Every field has a default, so an empty JSON object is valid.
///
/// # Examples
/// ```
/// use trackmsg_core::{DecoderConfig, Locale};
///
/// let config = DecoderConfig::from_json_str(r#"{ "locale": "en" }"#)?;
/// assert_eq!(config.locale, Locale::En);
/// assert_eq!(config.marker, 0xA4);
/// # Ok::<(), trackmsg_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Expected leading marker byte.
    pub marker: u8,
    /// Expected separator byte between the fixed fields and the free-form text.
    pub separator: u8,
    /// Display language for coordinates and annotations.
    pub locale: Locale,
    /// Suffix appended to altitude display strings.
    pub altitude_unit: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            marker: layout::MARKER,
            separator: layout::SEPARATOR,
            locale: Locale::default(),
            altitude_unit: "m".to_string(),
        }
    }
}

impl DecoderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = DecoderConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DecoderConfig::default());
        assert_eq!(config.separator, b'-');
        assert_eq!(config.altitude_unit, "m");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = DecoderConfig::from_json_str(r#"{ "precision": 3 }"#).unwrap_err();
        assert!(err.to_string().contains("invalid decoder config"));
    }

    #[test]
    fn hemisphere_names_per_locale() {
        assert_eq!(Locale::Zh.hemisphere_name("S"), Some("南纬"));
        assert_eq!(Locale::En.hemisphere_name("W"), Some("West "));
        assert_eq!(Locale::En.hemisphere_name("X"), None);
    }
}
