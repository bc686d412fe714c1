use thiserror::Error;

use super::layout::FieldName;

/// Fatal conditions that abort a parse.
///
/// # Examples
/// ```
/// use trackmsg_core::{FieldName, MessageError};
///
/// let err = MessageError::TooShort { field: FieldName::Altitude, needed: 40, actual: 35 };
/// assert!(err.to_string().starts_with("insufficient length for altitude"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    #[error("invalid hex")]
    InvalidHex(#[source] hex::FromHexError),
    #[error("insufficient length for {field}: need {needed} bytes, got {actual}")]
    TooShort {
        field: FieldName,
        needed: usize,
        actual: usize,
    },
}
