//! Inbound JSON envelope carrying a hex message.
//!
//! Only the envelope shape is modeled here; transport and storage belong to
//! the caller.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::DecoderConfig;
use crate::decode::{MessageRecord, decode_hex_message_with};

/// Fields every envelope must carry.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "IdNumber",
    "Content",
    "Time",
    "MessageId",
    "DeliveryCount",
    "NetworkMode",
];

/// Content ceiling applied by the collaborator in an earlier revision.
pub const DEFAULT_MAX_CONTENT_LEN: usize = 3500;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("envelope must be a JSON object")]
    NotAnObject,
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("field {field} must be a {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Content too long: {len} characters, limit {max}")]
    ContentTooLong { len: usize, max: usize },
}

/// A validated envelope. Fields other than `IdNumber` and `Content` are kept
/// as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub id_number: String,
    pub content: String,
    pub time: Value,
    pub message_id: Value,
    pub delivery_count: Value,
    pub network_mode: Value,
}

/// An envelope paired with the decoded record for its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeRecord {
    pub envelope: Envelope,
    pub record: MessageRecord,
}

impl Envelope {
    /// Parses and validates an envelope.
    ///
    /// All missing required fields are reported together. `max_content_len`
    /// of `None` disables the length check.
    ///
    /// # Examples
    /// ```
    /// use trackmsg_core::Envelope;
    ///
    /// let err = Envelope::from_json_str(r#"{ "IdNumber": "1" }"#, None).unwrap_err();
    /// assert!(err.to_string().starts_with("missing required fields: Content, Time"));
    /// ```
    pub fn from_json_str(
        json: &str,
        max_content_len: Option<usize>,
    ) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value, max_content_len)
    }

    pub fn from_value(value: Value, max_content_len: Option<usize>) -> Result<Self, EnvelopeError> {
        let Value::Object(mut object) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| !object.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(EnvelopeError::MissingFields(missing));
        }

        let content = take_string(&mut object, "Content")?;
        if let Some(max) = max_content_len {
            let len = content.chars().count();
            if len > max {
                return Err(EnvelopeError::ContentTooLong { len, max });
            }
        }

        let id_number = match object.remove("IdNumber") {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(EnvelopeError::InvalidField {
                    field: "IdNumber",
                    expected: "string or number",
                });
            }
        };
        let request_id = match object.remove("RequestId") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id),
            Some(_) => {
                return Err(EnvelopeError::InvalidField {
                    field: "RequestId",
                    expected: "string",
                });
            }
        };

        Ok(Envelope {
            request_id,
            id_number,
            content,
            time: object.remove("Time").unwrap_or(Value::Null),
            message_id: object.remove("MessageId").unwrap_or(Value::Null),
            delivery_count: object.remove("DeliveryCount").unwrap_or(Value::Null),
            network_mode: object.remove("NetworkMode").unwrap_or(Value::Null),
        })
    }

    pub fn decode(self, config: &DecoderConfig) -> EnvelopeRecord {
        let record = decode_hex_message_with(&self.content, config).to_record();
        EnvelopeRecord {
            envelope: self,
            record,
        }
    }
}

fn take_string(
    object: &mut Map<String, Value>,
    field: &'static str,
) -> Result<String, EnvelopeError> {
    match object.remove(field) {
        Some(Value::String(value)) => Ok(value),
        _ => Err(EnvelopeError::InvalidField {
            field,
            expected: "string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ParseStatus;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "RequestId": "req-1",
            "IdNumber": "2019070111201",
            "Content": "A430383A31353A34324E343030352E37363738334531313632332E31323334352B30303039392E352D4F4B",
            "Time": "2021-12-16 10:30:33",
            "MessageId": 1,
            "DeliveryCount": 1,
            "NetworkMode": "BD"
        })
    }

    #[test]
    fn valid_envelope_decodes() {
        let envelope = Envelope::from_value(sample(), Some(DEFAULT_MAX_CONTENT_LEN)).unwrap();
        assert_eq!(envelope.request_id.as_deref(), Some("req-1"));
        assert_eq!(envelope.id_number, "2019070111201");
        let decoded = envelope.decode(&DecoderConfig::default());
        assert_eq!(decoded.record.status, ParseStatus::Success);
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let mut value = sample();
        let object = value.as_object_mut().unwrap();
        object.remove("Time");
        object.remove("NetworkMode");
        let err = Envelope::from_value(value, None).unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: Time, NetworkMode");
    }

    #[test]
    fn numeric_id_number_is_accepted() {
        let mut value = sample();
        value["IdNumber"] = json!(42);
        let envelope = Envelope::from_value(value, None).unwrap();
        assert_eq!(envelope.id_number, "42");
    }

    #[test]
    fn content_must_be_a_string() {
        let mut value = sample();
        value["Content"] = json!(12);
        let err = Envelope::from_value(value, None).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidField { field: "Content", .. }));
    }

    #[test]
    fn content_ceiling_is_enforced() {
        let mut value = sample();
        value["Content"] = json!("A4".repeat(1751));
        let err = Envelope::from_value(value, Some(DEFAULT_MAX_CONTENT_LEN)).unwrap_err();
        assert!(matches!(err, EnvelopeError::ContentTooLong { len: 3502, max: 3500 }));
    }

    #[test]
    fn content_ceiling_counts_characters() {
        // Four characters, twelve UTF-8 bytes.
        let mut value = sample();
        value["Content"] = json!("位置位置");
        assert!(Envelope::from_value(value.clone(), Some(4)).is_ok());
        let err = Envelope::from_value(value, Some(3)).unwrap_err();
        assert!(matches!(err, EnvelopeError::ContentTooLong { len: 4, max: 3 }));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = Envelope::from_json_str("[1, 2]", None).unwrap_err();
        assert!(matches!(err, EnvelopeError::NotAnObject));
    }

    #[test]
    fn bad_content_still_yields_a_record() {
        let mut value = sample();
        value["Content"] = json!("A4XYZ");
        let decoded = Envelope::from_value(value, None)
            .unwrap()
            .decode(&DecoderConfig::default());
        assert_eq!(decoded.record.status, ParseStatus::Fatal);
        assert_eq!(decoded.record.error.as_deref(), Some("invalid hex"));
    }
}
